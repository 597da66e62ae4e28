use crate::{
    conservation_law::{Euler, EulerState},
    gas_law::EulerSpecies,
    physical_quantities::VariableDelta,
};

use super::*;

/// Simple Low-dissipation AUSM flux of Shima & Kitamura (2011), AIAA J. 49.
pub struct SlauRiemannSolver;

fn pressure_split(mach: f64, sign: f64) -> f64 {
    if mach.abs() >= 1. {
        0.5 * (1. + sign * mach.signum())
    } else {
        0.25 * (2. - sign * mach) * (mach + sign).powi(2)
    }
}

impl RiemannFluxSolver<Euler> for SlauRiemannSolver {
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
        let rho_l = left.density();
        let rho_r = right.density();
        let p_l = left.pressure();
        let p_r = right.pressure();
        let c_half = 0.5 * (left.speed_of_sound() + right.speed_of_sound());
        let mach_l = v_l / c_half;
        let mach_r = v_r / c_half;

        let mach_hat = ((0.5 * (left.velocity2() + right.velocity2())).sqrt() / c_half).min(1.);
        let chi = (1. - mach_hat).powi(2);
        let g = -mach_l.min(0.).max(-1.) * mach_r.max(0.).min(1.);

        // Mass flux
        let v_bar = (rho_l * v_l.abs() + rho_r * v_r.abs()) / (rho_l + rho_r);
        let v_plus = (1. - g) * v_bar + g * v_l.abs();
        let v_minus = (1. - g) * v_bar + g * v_r.abs();
        let mass_flux = 0.5
            * (rho_l * (v_l + v_plus) + rho_r * (v_r - v_minus) - chi / c_half * (p_r - p_l));

        // Pressure flux
        let beta_l = pressure_split(mach_l, 1.);
        let beta_r = pressure_split(mach_r, -1.);
        let p_half = 0.5 * (p_l + p_r)
            + 0.5 * (beta_l - beta_r) * (p_l - p_r)
            + (1. - chi) * (beta_l + beta_r - 1.) * 0.5 * (p_l + p_r);

        let m_plus = 0.5 * (mass_flux + mass_flux.abs());
        let m_minus = 0.5 * (mass_flux - mass_flux.abs());
        let velocity = m_plus * left.velocity() + m_minus * right.velocity();
        let flux = VariableDelta::new([
            velocity.x + p_half * n_unit.x,
            velocity.y + p_half * n_unit.y,
            mass_flux,
            m_plus * left.specific_total_enthalpy() + m_minus * right.specific_total_enthalpy(),
        ]);

        let s_max = Euler::max_wave_speed(species, n_unit, left)
            .max(Euler::max_wave_speed(species, n_unit, right));
        FluxResult::new(face.area * flux, face.area * s_max)
    }
}
