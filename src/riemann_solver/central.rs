use super::*;

/// Arithmetic mean of the exact fluxes of both states, without any dissipation.
pub struct CentralRiemannSolver;

impl<L: ConservationLaw> RiemannFluxSolver<L> for CentralRiemannSolver {
    fn flux_states(
        &self,
        species: &L::Species,
        face: &Surface,
        left: &L::State,
        right: &L::State,
    ) -> FluxResult<L> {
        let flux_l = L::exact_flux(species, face, left);
        let flux_r = L::exact_flux(species, face, right);
        FluxResult::new(
            0.5 * (flux_l.flux + flux_r.flux),
            flux_l.lambda.max(flux_r.lambda),
        )
    }
}
