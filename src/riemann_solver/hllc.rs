use glam::DVec2;

use crate::{
    conservation_law::{Conserved, Euler, EulerState},
    gas_law::EulerSpecies,
    physical_quantities::VariableDelta,
};

use super::*;

/// HLLC Riemann solver
pub struct HLLCRiemannSolver;

fn conserved(density: f64, velocity: DVec2, specific_energy: f64) -> VariableDelta<Euler, Conserved> {
    VariableDelta::new([
        density * velocity.x,
        density * velocity.y,
        density,
        density * specific_energy,
    ])
}

impl RiemannFluxSolver<Euler> for HLLCRiemannSolver {
    /// See Section 10.4, 10.5 and 10.6 in Toro (2009)
    fn flux_states(
        &self,
        species: &EulerSpecies,
        face: &Surface,
        left: &EulerState,
        right: &EulerState,
    ) -> FluxResult<Euler> {
        let n_unit = face.normal;
        let v_l = left.velocity().dot(n_unit);
        let v_r = right.velocity().dot(n_unit);
        let a_l = left.speed_of_sound();
        let a_r = right.speed_of_sound();

        // velocity difference
        let v_r_m_v_l = v_r - v_l;

        // STEP 1: Pressure estimate
        let ppvrs = 0.5 * (left.pressure() + right.pressure())
            - 0.125 * v_r_m_v_l * (left.density() + right.density()) * (a_l + a_r);
        let p_star = ppvrs.max(0.);

        // STEP 2: wave speed estimates
        let gamma = species.gamma();
        let mut q_l = 1.;
        if p_star > left.pressure() && left.pressure() > 0. {
            q_l = (1. + 0.5 * gamma.gp1dg() * (p_star / left.pressure() - 1.)).sqrt();
        }
        let mut q_r = 1.;
        if p_star > right.pressure() && right.pressure() > 0. {
            q_r = (1. + 0.5 * gamma.gp1dg() * (p_star / right.pressure() - 1.)).sqrt();
        }

        let s_l_m_v_l = -a_l * q_l;
        let s_r_m_v_r = a_r * q_r;
        let s_l = s_l_m_v_l + v_l;
        let s_r = s_r_m_v_r + v_r;
        let s_star = (right.pressure() - left.pressure() + left.density() * v_l * s_l_m_v_l
            - right.density() * v_r * s_r_m_v_r)
            / (left.density() * s_l_m_v_l - right.density() * s_r_m_v_r);

        // STEP 3: HLLC flux
        let mut flux;
        if s_star >= 0. {
            // flux FL
            flux = Euler::exact_flux(species, face, left).flux / face.area;
            if s_l < 0. {
                // flux FL*
                let e_l = left.total_energy() / left.density();
                let starfac = left.density() * s_l_m_v_l / (s_l - s_star);
                let e_star = e_l
                    + (s_star - v_l) * (s_star + left.pressure() / (left.density() * s_l_m_v_l));
                let u_star = conserved(starfac, (s_star - v_l) * n_unit + left.velocity(), e_star);
                let u_l = conserved(left.density(), left.velocity(), e_l);
                flux += s_l * (u_star - u_l);
            }
        } else {
            // flux FR
            flux = Euler::exact_flux(species, face, right).flux / face.area;
            if s_r > 0. {
                // flux FR*
                let e_r = right.total_energy() / right.density();
                let starfac = right.density() * s_r_m_v_r / (s_r - s_star);
                let e_star = e_r
                    + (s_star - v_r) * (s_star + right.pressure() / (right.density() * s_r_m_v_r));
                let u_star =
                    conserved(starfac, (s_star - v_r) * n_unit + right.velocity(), e_star);
                let u_r = conserved(right.density(), right.velocity(), e_r);
                flux += s_r * (u_star - u_r);
            }
        }
        debug_assert!(!(flux[2].is_nan() || flux[2].is_infinite()));

        let s_max = s_l
            .abs()
            .max(s_r.abs())
            .max(Euler::max_wave_speed(species, n_unit, left))
            .max(Euler::max_wave_speed(species, n_unit, right));
        FluxResult::new(face.area * flux, face.area * s_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_hllc_solver_symmetry() {
        let species = EulerSpecies::new(5. / 3., 1., 0.7, 1., 0.);
        let left = EulerState::new(&species, 0.3 * DVec2::X, 1., 1.);
        let right = EulerState::new(&species, -0.3 * DVec2::X, 1., 1.);
        let face = Surface::new(1., DVec2::ZERO, DVec2::X);

        let fluxes = HLLCRiemannSolver.flux_states(&species, &face, &left, &right);

        // Symmetric collision: no mass or energy crosses the face.
        assert_approx_eq!(f64, fluxes.flux[2], 0., epsilon = 1e-14);
        assert_approx_eq!(f64, fluxes.flux[3], 0., epsilon = 1e-14);
        assert_approx_eq!(f64, fluxes.flux[1], 0., epsilon = 1e-14);
        assert!(fluxes.flux[0] > 1.);
    }

    #[test]
    fn test_hllc_supersonic_is_upwind() {
        let species = EulerSpecies::air();
        let left = EulerState::new(&species, 3. * DVec2::Y, 1., 1.);
        let right = EulerState::new(&species, 3. * DVec2::Y, 0.5, 0.2);
        let face = Surface::new(2., DVec2::ZERO, DVec2::Y);

        let fluxes = HLLCRiemannSolver.flux_states(&species, &face, &left, &right);
        let exact = Euler::exact_flux(&species, &face, &left);
        for k in 0..4 {
            assert_approx_eq!(f64, fluxes.flux[k], exact.flux[k], epsilon = 1e-12);
        }
    }
}
