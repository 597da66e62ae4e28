//! Residual assembly: the net conserved flux into every cell.
//!
//! Assembly runs in two passes per axis, following the compute/apply split of a face based
//! finite volume solver. First every face normal to the axis gets its flux, oriented towards
//! increasing index. Then every cell gathers its lower and upper face of that axis. No cell is
//! written by two loop iterations of the same pass.

use ndarray::{Array1, Array2};

use crate::{
    boundary::{BoundaryCondition, BoundaryRegistry, BoundaryTreatment, BoundaryType},
    conservation_law::{ConservationLaw, SetBasis},
    errors::EngineError,
    flux::FluxResult,
    gradients::LeastSquaresMetric,
    mesh::Mesh,
    muscl::MusclFlux,
    parallel::ExecutionPolicy,
    physical_quantities::{Gradient, VariableSet},
    solution_field::SolutionField,
    utils::boundary_axis_side,
};

/// Look up the handler of every edge of `field`.
///
/// A flux type handler has to provide a boundary flux.
fn resolve_conditions<'a, L: ConservationLaw, B: SetBasis>(
    registry: &'a BoundaryRegistry<L>,
    field: &SolutionField<L, B>,
) -> Result<Vec<&'a BoundaryCondition<L>>, EngineError> {
    field
        .bc_types()
        .iter()
        .map(|&kind| {
            let condition = registry.resolve(kind)?;
            match (condition.treatment, condition.flux) {
                (BoundaryTreatment::Flux, None) => {
                    Err(EngineError::UnmatchedBoundaryCondition(kind))
                }
                _ => Ok(condition),
            }
        })
        .collect()
}

/// Recompute the ghost values of every ghost cell edge that has an update rule.
///
/// Fixed edges keep their values.
pub fn update_boundaries<L: ConservationLaw, B: SetBasis>(
    policy: ExecutionPolicy,
    registry: &BoundaryRegistry<L>,
    species: &L::Species,
    mesh: &Mesh,
    field: &mut SolutionField<L, B>,
) -> Result<(), EngineError> {
    field.check_mesh(mesh)?;
    let conditions = resolve_conditions(registry, field)?;
    apply_ghost_updates(policy, &conditions, species, mesh, field)
}

fn apply_ghost_updates<L: ConservationLaw, B: SetBasis>(
    policy: ExecutionPolicy,
    conditions: &[&BoundaryCondition<L>],
    species: &L::Species,
    mesh: &Mesh,
    field: &mut SolutionField<L, B>,
) -> Result<(), EngineError> {
    for (id, condition) in conditions.iter().enumerate() {
        let update = match (condition.treatment, condition.update) {
            (BoundaryTreatment::GhostCell, Some(update)) => update,
            _ => continue,
        };
        let len = mesh.boundary_len(id);
        let reference = field.reference(id)?;
        let interior = field.interior();
        let ghosts = Array1::from(policy.map_collect(len, |k| {
            let cell = mesh.boundary_cell(id, k);
            let state = update(
                species,
                &mesh.boundary_face(id, k),
                &mesh.cells()[cell],
                &interior[cell].to_state(species),
                &reference[k].to_state(species),
            );
            VariableSet::from_state(species, &state)
        }));
        *field.boundary_mut(id)? = ghosts;
    }
    Ok(())
}

/// Update the boundaries of `field` and return the residual of every cell.
///
/// Builds the least squares metric of `mesh` on every call, use [`crate::integrate`] to
/// advance a solution.
pub fn assemble_residual<L: ConservationLaw, B: SetBasis>(
    policy: ExecutionPolicy,
    muscl: &MusclFlux<L>,
    registry: &BoundaryRegistry<L>,
    species: &L::Species,
    mesh: &Mesh,
    field: &mut SolutionField<L, B>,
) -> Result<Array2<FluxResult<L>>, EngineError> {
    let metric = LeastSquaresMetric::new(policy, mesh, field.bc_types())?;
    residual(policy, &metric, muscl, registry, species, mesh, field)
}

pub(crate) fn residual<L: ConservationLaw, B: SetBasis>(
    policy: ExecutionPolicy,
    metric: &LeastSquaresMetric,
    muscl: &MusclFlux<L>,
    registry: &BoundaryRegistry<L>,
    species: &L::Species,
    mesh: &Mesh,
    field: &mut SolutionField<L, B>,
) -> Result<Array2<FluxResult<L>>, EngineError> {
    field.check_mesh(mesh)?;
    let periodic = BoundaryType::periodic_axes(field.bc_types());
    if metric.periodic() != periodic {
        return Err(EngineError::ShapeMismatch {
            what: "periodic axes of least squares metric",
            expected: periodic.map(usize::from),
            found: metric.periodic().map(usize::from),
        });
    }
    let conditions = resolve_conditions(registry, field)?;
    apply_ghost_updates(policy, &conditions, species, mesh, field)?;
    let gradients = metric.gradients(policy, mesh, field)?;

    let field: &SolutionField<L, B> = field;
    let [ni, nj] = mesh.shape();
    let mut residual = Array2::from_elem((ni, nj), FluxResult::zero());
    for axis in 0..mesh.dimensionality().n_axes() {
        let faces = face_fluxes(
            policy,
            axis,
            muscl,
            &conditions,
            species,
            mesh,
            field,
            &gradients,
        );
        policy.for_each_indexed(&mut residual, |(i, j), cell_residual| {
            let upper = match axis {
                0 => [i + 1, j],
                _ => [i, j + 1],
            };
            *cell_residual += faces[[i, j]];
            *cell_residual -= faces[upper];
        });
    }
    Ok(residual)
}

/// Fluxes through every face normal to `axis`, oriented towards increasing index.
#[allow(clippy::too_many_arguments)]
fn face_fluxes<L: ConservationLaw, B: SetBasis>(
    policy: ExecutionPolicy,
    axis: usize,
    muscl: &MusclFlux<L>,
    conditions: &[&BoundaryCondition<L>],
    species: &L::Species,
    mesh: &Mesh,
    field: &SolutionField<L, B>,
    gradients: &Array2<Gradient<L, B>>,
) -> Array2<FluxResult<L>> {
    let shape = mesh.face_shape(axis);
    let n = mesh.shape()[axis];
    let values = field.interior();
    let cells = mesh.cells();
    let periodic = conditions[2 * axis].treatment == BoundaryTreatment::Periodic;

    let mut fluxes = policy.build(shape, |(i, j)| {
        let along = [i, j][axis];
        let left = match axis {
            0 => (i.wrapping_sub(1), j),
            _ => (i, j.wrapping_sub(1)),
        };

        if along > 0 && along < n {
            let dx = cells[[i, j]].centroid - cells[left].centroid;
            return muscl.face_flux(
                species,
                &mesh.face(axis, i, j),
                &values[left],
                &gradients[left],
                &values[[i, j]],
                &gradients[[i, j]],
                dx,
            );
        }

        if periodic {
            // The pair is evaluated once, at the upper face, and copied to the lower one.
            if along == 0 {
                return FluxResult::zero();
            }
            let first = match axis {
                0 => (0, j),
                _ => (i, 0),
            };
            let dx = cells[first].centroid + mesh.period(axis) - cells[left].centroid;
            return muscl.face_flux(
                species,
                &mesh.face(axis, i, j),
                &values[left],
                &gradients[left],
                &values[first],
                &gradients[first],
                dx,
            );
        }

        let id = 2 * axis + usize::from(along == n);
        let k = [i, j][1 - axis];
        boundary_face_flux(
            id, k, muscl, conditions[id], species, mesh, field, gradients,
        )
    });

    if periodic {
        for k in 0..shape[1 - axis] {
            let (lower, upper) = match axis {
                0 => ((0, k), (n, k)),
                _ => ((k, 0), (k, n)),
            };
            fluxes[lower] = fluxes[upper];
        }
    }
    fluxes
}

/// Flux through face `k` of boundary `id`, oriented towards increasing index.
#[allow(clippy::too_many_arguments)]
fn boundary_face_flux<L: ConservationLaw, B: SetBasis>(
    id: usize,
    k: usize,
    muscl: &MusclFlux<L>,
    condition: &BoundaryCondition<L>,
    species: &L::Species,
    mesh: &Mesh,
    field: &SolutionField<L, B>,
    gradients: &Array2<Gradient<L, B>>,
) -> FluxResult<L> {
    let face = mesh.boundary_face(id, k);
    let index = mesh.boundary_cell(id, k);
    let cell = mesh.cells()[index];
    let q = field.interior()[index];

    let outward = match (condition.treatment, condition.flux) {
        (BoundaryTreatment::Flux, Some(flux)) => flux(
            species,
            &face,
            &cell,
            &q.to_state(species),
            &field.references()[id][k].to_state(species),
        ),
        _ => muscl.ghost_flux(
            species,
            &face,
            &q,
            &gradients[index],
            &field.boundaries()[id][k],
            2. * (face.centroid - cell.centroid),
        ),
    };

    match boundary_axis_side(id) {
        (_, 0) => -outward,
        _ => outward,
    }
}
