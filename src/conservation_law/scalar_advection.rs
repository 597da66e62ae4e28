use glam::DVec2;

use super::{BasisType, Components, ConservationLaw, LawType};
use crate::{flux::FluxResult, geometry::Surface, physical_quantities::VariableDelta};

/// Passive scalar transported by a prescribed velocity field.
///
/// The velocity components are carried as variables with zero flux, so every basis
/// stores the same vector `[u, v, phi]`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScalarAdvection;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScalarSpecies;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScalarState {
    pub velocity: DVec2,
    pub scalar: f64,
}

impl ScalarState {
    pub fn new(velocity: DVec2, scalar: f64) -> Self {
        Self { velocity, scalar }
    }
}

impl ConservationLaw for ScalarAdvection {
    const TYPE: LawType = LawType::ScalarAdvection;
    const N_VAR: usize = 3;
    const NONLINEAR_FIELDS: &'static [usize] = &[];

    type Species = ScalarSpecies;
    type State = ScalarState;

    fn set_to_state(_species: &ScalarSpecies, _basis: BasisType, q: &Components) -> ScalarState {
        ScalarState::new(DVec2::new(q[0], q[1]), q[2])
    }

    fn state_to_set(_species: &ScalarSpecies, _basis: BasisType, state: &ScalarState) -> Components {
        [state.velocity.x, state.velocity.y, state.scalar, 0.]
    }

    fn delta_to_conserved(
        _species: &ScalarSpecies,
        _basis: BasisType,
        _state: &ScalarState,
        dq: &Components,
    ) -> Components {
        *dq
    }

    fn delta_from_conserved(
        _species: &ScalarSpecies,
        _basis: BasisType,
        _state: &ScalarState,
        du: &Components,
    ) -> Components {
        *du
    }

    fn to_characteristic(
        _species: &ScalarSpecies,
        _normal: DVec2,
        _state: &ScalarState,
        du: &Components,
    ) -> Components {
        *du
    }

    fn from_characteristic(
        _species: &ScalarSpecies,
        _normal: DVec2,
        _state: &ScalarState,
        dw: &Components,
    ) -> Components {
        *dw
    }

    fn wave_speeds(_species: &ScalarSpecies, normal: DVec2, state: &ScalarState) -> Components {
        [0., 0., state.velocity.dot(normal), 0.]
    }

    fn exact_flux(
        species: &ScalarSpecies,
        face: &Surface,
        state: &ScalarState,
    ) -> FluxResult<ScalarAdvection> {
        let un = state.velocity.dot(face.normal);
        FluxResult::new(
            VariableDelta::new([0., 0., face.area * state.scalar * un, 0.]),
            face.area * Self::max_wave_speed(species, face.normal, state),
        )
    }

    fn roe_average(_species: &ScalarSpecies, left: &ScalarState, right: &ScalarState) -> ScalarState {
        ScalarState::new(
            0.5 * (left.velocity + right.velocity),
            0.5 * (left.scalar + right.scalar),
        )
    }

    fn velocity(state: &ScalarState) -> DVec2 {
        state.velocity
    }

    fn quantity_names() -> &'static [&'static str] {
        &["VelocityX", "VelocityY", "Scalar"]
    }

    fn quantities(state: &ScalarState) -> Vec<f64> {
        vec![state.velocity.x, state.velocity.y, state.scalar]
    }
}
