use crate::{conservation_law::Conserved, physical_quantities::VariableSet};

use super::*;

/// Local Lax-Friedrichs flux: central flux plus scalar dissipation scaled by the fastest wave.
pub struct RusanovRiemannSolver;

impl<L: ConservationLaw> RiemannFluxSolver<L> for RusanovRiemannSolver {
    fn flux_states(
        &self,
        species: &L::Species,
        face: &Surface,
        left: &L::State,
        right: &L::State,
    ) -> FluxResult<L> {
        let flux_l = L::exact_flux(species, face, left);
        let flux_r = L::exact_flux(species, face, right);
        let s_max = L::max_wave_speed(species, face.normal, left)
            .max(L::max_wave_speed(species, face.normal, right));
        let u_l = VariableSet::<L, Conserved>::from_state(species, left);
        let u_r = VariableSet::<L, Conserved>::from_state(species, right);

        FluxResult::new(
            0.5 * (flux_l.flux + flux_r.flux) - 0.5 * s_max * face.area * (u_r - u_l),
            s_max * face.area,
        )
    }
}
