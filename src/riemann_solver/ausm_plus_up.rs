use crate::{
    conservation_law::{Euler, EulerState},
    gas_law::EulerSpecies,
    physical_quantities::VariableDelta,
};

use super::*;

const K_P: f64 = 0.25;
const K_U: f64 = 0.75;
const SIGMA: f64 = 1.;
const BETA: f64 = 1. / 8.;

/// AUSM+-up flux for all speeds, see Liou (2006), J. Comput. Phys. 214.
///
/// The low Mach scaling uses the reference Mach number `minf` of the species.
pub struct AusmPlusUpRiemannSolver;

fn mach_1(mach: f64, sign: f64) -> f64 {
    0.5 * (mach + sign * mach.abs())
}

fn mach_2(mach: f64, sign: f64) -> f64 {
    sign * 0.25 * (mach + sign).powi(2)
}

fn mach_4(mach: f64, sign: f64) -> f64 {
    if mach.abs() >= 1. {
        mach_1(mach, sign)
    } else {
        mach_2(mach, sign) * (1. - sign * 16. * BETA * mach_2(mach, -sign))
    }
}

fn pressure_5(mach: f64, sign: f64, alpha: f64) -> f64 {
    if mach.abs() >= 1. {
        mach_1(mach, sign) / mach
    } else {
        mach_2(mach, sign) * ((sign * 2. - mach) - sign * 16. * alpha * mach * mach_2(mach, -sign))
    }
}

impl RiemannFluxSolver<Euler> for AusmPlusUpRiemannSolver {
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
        let a_half = 0.5 * (left.speed_of_sound() + right.speed_of_sound());
        let rho_half = 0.5 * (left.density() + right.density());
        let mach_l = v_l / a_half;
        let mach_r = v_r / a_half;

        // Low Mach scaling
        let mach_bar2 = 0.5 * (v_l * v_l + v_r * v_r) / (a_half * a_half);
        let mach_02 = mach_bar2.max(species.minf * species.minf).min(1.);
        let mach_0 = mach_02.sqrt();
        let f_a = mach_0 * (2. - mach_0);
        let alpha = 3. / 16. * (-4. + 5. * f_a * f_a);

        // Interface Mach number with pressure diffusion
        let mach_p = -K_P / f_a * (1. - SIGMA * mach_bar2).max(0.) * (right.pressure() - left.pressure())
            / (rho_half * a_half * a_half);
        let mach_half = mach_4(mach_l, 1.) + mach_4(mach_r, -1.) + mach_p;

        // Interface pressure with velocity diffusion
        let p5_l = pressure_5(mach_l, 1., alpha);
        let p5_r = pressure_5(mach_r, -1., alpha);
        let p_u = -K_U * p5_l * p5_r * (left.density() + right.density()) * f_a * a_half * (v_r - v_l);
        let p_half = p5_l * left.pressure() + p5_r * right.pressure() + p_u;

        let upwind = if mach_half > 0. { left } else { right };
        let mass_flux = a_half * mach_half * upwind.density();
        let velocity = upwind.velocity();
        let flux = VariableDelta::new([
            mass_flux * velocity.x + p_half * n_unit.x,
            mass_flux * velocity.y + p_half * n_unit.y,
            mass_flux,
            mass_flux * upwind.specific_total_enthalpy(),
        ]);

        let s_max = Euler::max_wave_speed(species, n_unit, left)
            .max(Euler::max_wave_speed(species, n_unit, right));
        FluxResult::new(face.area * flux, face.area * s_max)
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_split_polynomials_partition() {
        for mach in [-1.5, -0.7, -0.1, 0., 0.3, 0.99, 2.] {
            assert_approx_eq!(f64, mach_4(mach, 1.) + mach_4(mach, -1.), mach, epsilon = 1e-14);
            let alpha = 3. / 16.;
            assert_approx_eq!(
                f64,
                pressure_5(mach, 1., alpha) + pressure_5(mach, -1., alpha),
                1.,
                epsilon = 1e-14
            );
        }
    }
}
