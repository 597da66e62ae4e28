use glam::DVec2;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    errors::EngineError,
    geometry::{polygon, Point, Surface, Volume},
    utils::{boundary_axis_side, boundary_cell, shape_of, Dimensionality},
};

/// Structured 1D or 2D mesh. Nodes are indexed `(i, j)` with `j` the fastest index,
/// the cells are the duals of the node array.
#[derive(Debug, Clone)]
pub struct Mesh {
    dimensionality: Dimensionality,
    nodes: Array2<Point>,
    cells: Array2<Volume>,
}

impl Mesh {
    pub fn new(dimensionality: Dimensionality, nodes: Array2<Point>) -> Result<Self, EngineError> {
        let [ni, nj] = shape_of(&nodes);
        let valid = match dimensionality {
            Dimensionality::OneD => ni > 1 && nj == 1,
            Dimensionality::TwoD => ni > 1 && nj > 1,
        };
        if !valid {
            return Err(EngineError::ShapeMismatch {
                what: "mesh nodes",
                expected: [ni.max(2), if dimensionality == Dimensionality::OneD { 1 } else { nj.max(2) }],
                found: [ni, nj],
            });
        }
        let cells = Self::dual(dimensionality, &nodes);
        Ok(Self {
            dimensionality,
            nodes,
            cells,
        })
    }

    /// Construct the cells from the nodes.
    pub fn dual(dimensionality: Dimensionality, nodes: &Array2<Point>) -> Array2<Volume> {
        let (ni, nj) = nodes.dim();
        match dimensionality {
            Dimensionality::OneD => Array2::from_shape_fn((ni - 1, 1), |(i, _)| {
                let a = nodes[[i, 0]];
                let b = nodes[[i + 1, 0]];
                Volume::new(a.distance(b), 0.5 * (a + b))
            }),
            Dimensionality::TwoD => Array2::from_shape_fn((ni - 1, nj - 1), |(i, j)| {
                polygon(&[
                    nodes[[i, j]],
                    nodes[[i + 1, j]],
                    nodes[[i + 1, j + 1]],
                    nodes[[i, j + 1]],
                ])
            }),
        }
    }

    /// Uniform 1D mesh of `n` cells on `[lower, upper]`.
    pub fn uniform_1d(n: usize, lower: f64, upper: f64) -> Result<Self, EngineError> {
        let dx = (upper - lower) / n as f64;
        let nodes = Array2::from_shape_fn((n + 1, 1), |(i, _)| {
            DVec2::new(lower + i as f64 * dx, 0.)
        });
        Self::new(Dimensionality::OneD, nodes)
    }

    /// Uniform cartesian 2D mesh of `shape` cells spanning the box `[lower, upper]`.
    pub fn cartesian_2d(shape: [usize; 2], lower: DVec2, upper: DVec2) -> Result<Self, EngineError> {
        let spacing = (upper - lower) / DVec2::new(shape[0] as f64, shape[1] as f64);
        let nodes = Array2::from_shape_fn((shape[0] + 1, shape[1] + 1), |(i, j)| {
            lower + DVec2::new(i as f64, j as f64) * spacing
        });
        Self::new(Dimensionality::TwoD, nodes)
    }

    /// Cartesian 2D mesh with interior nodes displaced randomly by up to `amplitude` times the
    /// spacing. Boundary nodes stay in place so periodic pairs still line up.
    pub fn cartesian_2d_perturbed(
        shape: [usize; 2],
        lower: DVec2,
        upper: DVec2,
        amplitude: f64,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let spacing = (upper - lower) / DVec2::new(shape[0] as f64, shape[1] as f64);
        let mut nodes = Array2::from_shape_fn((shape[0] + 1, shape[1] + 1), |(i, j)| {
            lower + DVec2::new(i as f64, j as f64) * spacing
        });
        // Row-major draws keep the jitter reproducible for a given seed.
        for ((i, j), node) in nodes.indexed_iter_mut() {
            if i > 0 && i < shape[0] && j > 0 && j < shape[1] {
                *node += amplitude
                    * spacing
                    * DVec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            }
        }
        Self::new(Dimensionality::TwoD, nodes)
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    /// Shape of the cell array.
    pub fn shape(&self) -> [usize; 2] {
        shape_of(&self.cells)
    }

    pub fn cells(&self) -> &Array2<Volume> {
        &self.cells
    }

    pub fn nodes(&self) -> &Array2<Point> {
        &self.nodes
    }

    /// Shape of the array of faces normal to `axis`.
    pub fn face_shape(&self, axis: usize) -> [usize; 2] {
        let [ni, nj] = self.shape();
        match axis {
            0 => [ni + 1, nj],
            _ => [ni, nj + 1],
        }
    }

    /// Face `(i, j)` normal to `axis`, oriented towards increasing index along that axis.
    pub fn face(&self, axis: usize, i: usize, j: usize) -> Surface {
        match self.dimensionality {
            Dimensionality::OneD => {
                let n = self.nodes.nrows();
                let direction = (self.nodes[[n - 1, 0]] - self.nodes[[0, 0]]).normalize();
                Surface::new(1., self.nodes[[i, 0]], direction)
            }
            Dimensionality::TwoD => {
                let (a, b) = match axis {
                    0 => (self.nodes[[i, j]], self.nodes[[i, j + 1]]),
                    _ => (self.nodes[[i, j]], self.nodes[[i + 1, j]]),
                };
                let edge = b - a;
                let area = edge.length();
                let normal = match axis {
                    0 => DVec2::new(edge.y, -edge.x),
                    _ => DVec2::new(-edge.y, edge.x),
                } / area;
                Surface::new(area, 0.5 * (a + b), normal)
            }
        }
    }

    /// Translation mapping the lower edge along `axis` onto the upper edge.
    pub fn period(&self, axis: usize) -> DVec2 {
        let (ni, nj) = self.nodes.dim();
        match axis {
            0 => self.nodes[[ni - 1, 0]] - self.nodes[[0, 0]],
            _ => self.nodes[[0, nj - 1]] - self.nodes[[0, 0]],
        }
    }

    /// Number of faces on boundary `id`.
    pub fn boundary_len(&self, id: usize) -> usize {
        let (axis, _) = boundary_axis_side(id);
        self.shape()[1 - axis]
    }

    /// Cell adjacent to face `k` of boundary `id`.
    pub fn boundary_cell(&self, id: usize, k: usize) -> (usize, usize) {
        boundary_cell(self.shape(), id, k)
    }

    /// Face `k` of boundary `id` with its normal pointing out of the domain.
    pub fn boundary_face(&self, id: usize, k: usize) -> Surface {
        let [ni, nj] = self.shape();
        match boundary_axis_side(id) {
            (0, 0) => self.face(0, 0, k).flipped(),
            (0, _) => self.face(0, ni, k),
            (_, 0) => self.face(1, k, 0).flipped(),
            _ => self.face(1, k, nj),
        }
    }
}
