use glam::{DMat2, DVec2};
use ndarray::Array2;

use crate::{
    boundary::BoundaryType,
    conservation_law::{ConservationLaw, SetBasis, N_COMPONENTS},
    errors::EngineError,
    mesh::Mesh,
    parallel::ExecutionPolicy,
    physical_quantities::Gradient,
    solution_field::SolutionField,
    utils::{check_shape, shape_of, Dimensionality},
};

/// A neighbour in the least squares stencil of a cell.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Neighbour {
    /// Interior or periodic neighbour, `dx` already shifted by the period.
    Cell { index: (usize, usize), dx: DVec2 },
    /// Mirrored ghost at a non-periodic edge.
    Boundary { dx: DVec2 },
}

impl Neighbour {
    pub(crate) fn dx(&self) -> DVec2 {
        match self {
            Neighbour::Cell { dx, .. } | Neighbour::Boundary { dx } => *dx,
        }
    }
}

/// Visit the face neighbours of cell `(i, j)`, lower side first along every axis.
pub(crate) fn for_each_neighbour<F: FnMut(Neighbour)>(
    mesh: &Mesh,
    periodic: [bool; 2],
    i: usize,
    j: usize,
    mut f: F,
) {
    let shape = mesh.shape();
    let cells = mesh.cells();
    let centroid = cells[[i, j]].centroid;
    for axis in 0..mesh.dimensionality().n_axes() {
        let idx = [i, j];
        let n = shape[axis];
        for side in 0..2 {
            let at_edge = if side == 0 { idx[axis] == 0 } else { idx[axis] == n - 1 };
            if !at_edge {
                let mut nb = idx;
                if side == 0 {
                    nb[axis] -= 1;
                } else {
                    nb[axis] += 1;
                }
                let index = (nb[0], nb[1]);
                f(Neighbour::Cell {
                    index,
                    dx: cells[index].centroid - centroid,
                });
            } else if periodic[axis] {
                let mut nb = idx;
                nb[axis] = if side == 0 { n - 1 } else { 0 };
                let index = (nb[0], nb[1]);
                let shift = if side == 0 {
                    -mesh.period(axis)
                } else {
                    mesh.period(axis)
                };
                f(Neighbour::Cell {
                    index,
                    dx: cells[index].centroid + shift - centroid,
                });
            } else {
                let face = mesh.boundary_face(2 * axis + side, idx[1 - axis]);
                f(Neighbour::Boundary {
                    dx: 2. * (face.centroid - centroid),
                });
            }
        }
    }
}

/// Factored least squares metrics of every cell of a mesh.
///
/// The geometric metric `sum(dx dx^T)` only depends on the mesh and the periodicity of its
/// edges, so it is accumulated and inverted once and reused for every gradient evaluation.
#[derive(Debug, Clone)]
pub struct LeastSquaresMetric {
    periodic: [bool; 2],
    inverse: Array2<DMat2>,
}

impl LeastSquaresMetric {
    pub fn new(
        policy: ExecutionPolicy,
        mesh: &Mesh,
        bc_types: &[BoundaryType],
    ) -> Result<Self, EngineError> {
        let periodic = BoundaryType::periodic_axes(bc_types);
        let metrics = policy.build(mesh.shape(), |(i, j)| {
            let mut matrix_wls = match mesh.dimensionality() {
                Dimensionality::OneD => {
                    let mut mat = DMat2::ZERO;
                    mat.y_axis.y = 1.;
                    mat
                }
                Dimensionality::TwoD => DMat2::ZERO,
            };
            for_each_neighbour(mesh, periodic, i, j, |neighbour| {
                let ds = neighbour.dx();
                matrix_wls += DMat2::from_cols(ds.x * ds, ds.y * ds);
            });
            matrix_wls
        });
        if let Some(((i, j), _)) = metrics.indexed_iter().find(|(_, m)| is_singular(m)) {
            return Err(EngineError::SingularLeastSquaresMetric { cell: [i, j] });
        }
        Ok(Self {
            periodic,
            inverse: metrics.mapv(|m| m.inverse()),
        })
    }

    pub fn shape(&self) -> [usize; 2] {
        shape_of(&self.inverse)
    }

    pub fn periodic(&self) -> [bool; 2] {
        self.periodic
    }

    /// Least squares gradients of the interior values of `field`.
    ///
    /// Non-periodic edges only contribute to the geometric metric.
    pub fn gradients<L: ConservationLaw, B: SetBasis>(
        &self,
        policy: ExecutionPolicy,
        mesh: &Mesh,
        field: &SolutionField<L, B>,
    ) -> Result<Array2<Gradient<L, B>>, EngineError> {
        field.check_mesh(mesh)?;
        check_shape(field.interior(), self.shape(), "least squares metric")?;
        let values = field.interior();
        Ok(policy.build(self.shape(), |(i, j)| {
            let q = values[[i, j]];
            let mut q_metric = [DVec2::ZERO; N_COMPONENTS];
            for_each_neighbour(mesh, self.periodic, i, j, |neighbour| {
                if let Neighbour::Cell { index, dx } = neighbour {
                    let dq = values[index] - q;
                    for k in 0..L::N_VAR {
                        q_metric[k] += dq[k] * dx;
                    }
                }
            });
            let inverse = self.inverse[[i, j]];
            let mut gradient = Gradient::zeros();
            for k in 0..L::N_VAR {
                gradient[k] = inverse.mul_vec2(q_metric[k]);
            }
            gradient
        }))
    }
}

/// Numerically singular, relative to the scale of the metric.
fn is_singular(metric: &DMat2) -> bool {
    let det = metric.determinant();
    let trace = metric.x_axis.x + metric.y_axis.y;
    det <= f64::EPSILON * trace * trace || !det.is_finite()
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        conservation_law::{Primitive, ScalarAdvection},
        physical_quantities::VariableSet,
    };

    fn linear_field(
        mesh: &Mesh,
        bc_types: Vec<BoundaryType>,
    ) -> SolutionField<ScalarAdvection, Primitive> {
        let interior = mesh.cells().map(|cell| {
            let x = cell.centroid;
            VariableSet::new([1., 0.5, 2. + 3. * x.x - 0.5 * x.y, 0.])
        });
        SolutionField::new(mesh.dimensionality(), interior, bc_types).unwrap()
    }

    #[test]
    fn test_linear_data_perturbed_mesh() {
        let mesh =
            Mesh::cartesian_2d_perturbed([8, 6], DVec2::ZERO, DVec2::new(2., 1.), 0.25, 42)
                .unwrap();
        let bc_types = vec![BoundaryType::Extrapolate; 4];
        let field = linear_field(&mesh, bc_types.clone());
        for policy in [ExecutionPolicy::Serial, ExecutionPolicy::Parallel] {
            let metric = LeastSquaresMetric::new(policy, &mesh, &bc_types).unwrap();
            let gradients = metric.gradients(policy, &mesh, &field).unwrap();
            for i in 1..7 {
                for j in 1..5 {
                    let g = gradients[[i, j]];
                    assert_approx_eq!(f64, g[2].x, 3., epsilon = 1e-10);
                    assert_approx_eq!(f64, g[2].y, -0.5, epsilon = 1e-10);
                    assert_approx_eq!(f64, g[0].length(), 0., epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_periodic_constant_data() {
        let mesh = Mesh::uniform_1d(10, 0., 1.).unwrap();
        let bc_types = vec![BoundaryType::Periodic; 2];
        let interior =
            Array2::from_elem((10, 1), VariableSet::<ScalarAdvection, Primitive>::splat(1.));
        let field = SolutionField::new(mesh.dimensionality(), interior, bc_types.clone()).unwrap();
        let metric = LeastSquaresMetric::new(ExecutionPolicy::Serial, &mesh, &bc_types).unwrap();
        let gradients = metric.gradients(ExecutionPolicy::Serial, &mesh, &field).unwrap();
        assert!(gradients.iter().all(|g| g.is_finite() && g[2] == DVec2::ZERO));
    }

    #[test]
    fn test_periodic_neighbours_are_shifted() {
        let mesh = Mesh::uniform_1d(4, 0., 1.).unwrap();
        let mut dxs = vec![];
        for_each_neighbour(&mesh, [true, false], 0, 0, |neighbour| dxs.push(neighbour.dx()));
        assert_eq!(dxs.len(), 2);
        assert_approx_eq!(f64, dxs[0].x, -0.25);
        assert_approx_eq!(f64, dxs[1].x, 0.25);

        let mut mirrored = vec![];
        for_each_neighbour(&mesh, [false, false], 3, 0, |neighbour| {
            if let Neighbour::Boundary { dx } = neighbour {
                mirrored.push(dx.x);
            }
        });
        assert_eq!(mirrored.len(), 1);
        assert_approx_eq!(f64, mirrored[0], 0.25);
    }

    #[test]
    fn test_1d_metric_is_regular() {
        let mesh = Mesh::uniform_1d(1, 0., 1.).unwrap();
        let bc_types = vec![BoundaryType::Extrapolate; 2];
        assert!(LeastSquaresMetric::new(ExecutionPolicy::Serial, &mesh, &bc_types).is_ok());
    }
}
