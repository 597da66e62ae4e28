use crate::{conservation_law::Conserved, physical_quantities::VariableSet};

use super::*;

/// Fraction of the largest wave speed below which nonlinear waves are smoothed (Harten).
const ENTROPY_FIX_FRACTION: f64 = 0.1;

/// Roe's approximate Riemann solver.
///
/// The jump is decomposed in characteristic fields at the Roe averaged state and every
/// field is upwinded with its own wave speed. For scalar advection this reduces to pure
/// upwinding.
pub struct RoeRiemannSolver;

impl RoeRiemannSolver {
    /// Harten's entropy fix, keeps the dissipation of a nonlinear field away from zero.
    fn entropy_fix(speed: f64, delta: f64) -> f64 {
        let speed = speed.abs();
        if speed < delta {
            0.5 * (speed * speed + delta * delta) / delta
        } else {
            speed
        }
    }
}

impl<L: ConservationLaw> RiemannFluxSolver<L> for RoeRiemannSolver {
    fn flux_states(
        &self,
        species: &L::Species,
        face: &Surface,
        left: &L::State,
        right: &L::State,
    ) -> FluxResult<L> {
        let flux_l = L::exact_flux(species, face, left);
        let flux_r = L::exact_flux(species, face, right);

        let average = L::roe_average(species, left, right);
        let speeds = L::wave_speeds(species, face.normal, &average);
        let roe_max = L::max_wave_speed(species, face.normal, &average);
        let delta = ENTROPY_FIX_FRACTION * roe_max;

        let jump = VariableSet::<L, Conserved>::from_state(species, right)
            - VariableSet::<L, Conserved>::from_state(species, left);
        let mut waves = jump.to_characteristic(species, &average, face.normal);
        for k in 0..L::N_VAR {
            let speed = if delta > 0. && L::NONLINEAR_FIELDS.contains(&k) {
                Self::entropy_fix(speeds[k], delta)
            } else {
                speeds[k].abs()
            };
            waves[k] *= speed;
        }
        let dissipation = waves.to_basis::<Conserved>(species, &average, face.normal);

        let s_max = roe_max
            .max(L::max_wave_speed(species, face.normal, left))
            .max(L::max_wave_speed(species, face.normal, right));
        FluxResult::new(
            0.5 * (flux_l.flux + flux_r.flux) - 0.5 * face.area * dissipation,
            s_max * face.area,
        )
    }
}
