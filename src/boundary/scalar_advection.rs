use super::{BoundaryCondition, BoundaryRegistry, BoundaryType, StandardBoundaryConditions};
use crate::{
    conservation_law::{ScalarAdvection, ScalarSpecies, ScalarState},
    geometry::{Surface, Volume},
};

impl StandardBoundaryConditions for ScalarAdvection {
    fn register_boundary_conditions(registry: &mut BoundaryRegistry<Self>) {
        registry.register(BoundaryCondition::ghost_cell(BoundaryType::Riemann, upwind));
    }
}

/// Inflow takes the reference value, outflow the interior one.
fn upwind(
    _species: &ScalarSpecies,
    face: &Surface,
    _cell: &Volume,
    interior: &ScalarState,
    reference: &ScalarState,
) -> ScalarState {
    if interior.velocity.dot(face.normal) >= 0. {
        *interior
    } else {
        *reference
    }
}
