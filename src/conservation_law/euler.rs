use glam::DVec2;

use super::{BasisType, Components, ConservationLaw, LawType};
use crate::{flux::FluxResult, gas_law::EulerSpecies, geometry::Surface, physical_quantities::VariableDelta};

/// Euler equations of gas dynamics.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Euler;

/// Thermodynamic state of an ideal gas with all derived quantities cached.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EulerState {
    pressure: f64,
    density: f64,
    temperature: f64,
    specific_total_enthalpy: f64,
    velocity2: f64,
    speed_of_sound2: f64,
    velocity: DVec2,
}

impl EulerState {
    pub fn new(species: &EulerSpecies, velocity: DVec2, density: f64, pressure: f64) -> Self {
        let velocity2 = velocity.length_squared();
        let speed_of_sound2 = species.sound_speed2(pressure, density);
        Self {
            pressure,
            density,
            temperature: pressure / (density * species.gas_constant),
            specific_total_enthalpy: speed_of_sound2 * species.gamma().odgm1() + 0.5 * velocity2,
            velocity2,
            speed_of_sound2,
            velocity,
        }
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn specific_total_enthalpy(&self) -> f64 {
        self.specific_total_enthalpy
    }

    pub fn velocity2(&self) -> f64 {
        self.velocity2
    }

    pub fn speed_of_sound2(&self) -> f64 {
        self.speed_of_sound2
    }

    pub fn speed_of_sound(&self) -> f64 {
        self.speed_of_sound2.sqrt()
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Total energy per unit volume.
    pub fn total_energy(&self) -> f64 {
        self.density * self.specific_total_enthalpy - self.pressure
    }
}

/// Primitive increment [du, dv, drho, dp] as conserved increment.
fn primitive_to_conserved(species: &EulerSpecies, state: &EulerState, dq: &Components) -> Components {
    let [du, dv, dr, dp] = *dq;
    let u = state.velocity;
    let r = state.density;
    [
        u.x * dr + r * du,
        u.y * dr + r * dv,
        dr,
        0.5 * state.velocity2 * dr + r * (u.x * du + u.y * dv) + dp * species.gamma().odgm1(),
    ]
}

fn conserved_to_primitive(species: &EulerSpecies, state: &EulerState, du: &Components) -> Components {
    let [dmx, dmy, dr, de] = *du;
    let u = state.velocity;
    let r_inv = 1. / state.density;
    [
        (dmx - u.x * dr) * r_inv,
        (dmy - u.y * dr) * r_inv,
        dr,
        species.gamma().gm1() * (de - u.x * dmx - u.y * dmy + 0.5 * state.velocity2 * dr),
    ]
}

fn viscous_to_primitive(state: &EulerState, dq: &Components) -> Components {
    let [du, dv, dt, dp] = *dq;
    let dr = state.density * (dp / state.pressure - dt / state.temperature);
    [du, dv, dr, dp]
}

fn primitive_to_viscous(state: &EulerState, dq: &Components) -> Components {
    let [du, dv, dr, dp] = *dq;
    let dt = state.temperature * (dp / state.pressure - dr / state.density);
    [du, dv, dt, dp]
}

impl ConservationLaw for Euler {
    const TYPE: LawType = LawType::Euler;
    const N_VAR: usize = 4;
    const NONLINEAR_FIELDS: &'static [usize] = &[2, 3];

    type Species = EulerSpecies;
    type State = EulerState;

    fn set_to_state(species: &EulerSpecies, basis: BasisType, q: &Components) -> EulerState {
        match basis {
            BasisType::Conserved => {
                let density = q[2];
                let momentum = DVec2::new(q[0], q[1]);
                let velocity = momentum / density;
                let pressure = species.gamma().gm1() * (q[3] - 0.5 * momentum.dot(velocity));
                EulerState::new(species, velocity, density, pressure)
            }
            BasisType::Primitive => EulerState::new(species, DVec2::new(q[0], q[1]), q[2], q[3]),
            BasisType::Viscous => {
                let density = q[3] / (species.gas_constant * q[2]);
                EulerState::new(species, DVec2::new(q[0], q[1]), density, q[3])
            }
        }
    }

    fn state_to_set(species: &EulerSpecies, basis: BasisType, state: &EulerState) -> Components {
        let u = state.velocity;
        match basis {
            BasisType::Conserved => [
                state.density * u.x,
                state.density * u.y,
                state.density,
                state.pressure * species.gamma().odgm1() + 0.5 * state.density * state.velocity2,
            ],
            BasisType::Primitive => [u.x, u.y, state.density, state.pressure],
            BasisType::Viscous => [u.x, u.y, state.temperature, state.pressure],
        }
    }

    fn delta_to_conserved(
        species: &EulerSpecies,
        basis: BasisType,
        state: &EulerState,
        dq: &Components,
    ) -> Components {
        match basis {
            BasisType::Conserved => *dq,
            BasisType::Primitive => primitive_to_conserved(species, state, dq),
            BasisType::Viscous => {
                primitive_to_conserved(species, state, &viscous_to_primitive(state, dq))
            }
        }
    }

    fn delta_from_conserved(
        species: &EulerSpecies,
        basis: BasisType,
        state: &EulerState,
        du: &Components,
    ) -> Components {
        match basis {
            BasisType::Conserved => *du,
            BasisType::Primitive => conserved_to_primitive(species, state, du),
            BasisType::Viscous => {
                primitive_to_viscous(state, &conserved_to_primitive(species, state, du))
            }
        }
    }

    /// Amplitudes ordered as [entropy, vorticity, acoustic (un - a), acoustic (un + a)].
    fn to_characteristic(
        species: &EulerSpecies,
        normal: DVec2,
        state: &EulerState,
        du: &Components,
    ) -> Components {
        let [dvx, dvy, dr, dp] = conserved_to_primitive(species, state, du);
        let dv = DVec2::new(dvx, dvy);
        let dun = dv.dot(normal);
        let dut = dv.dot(normal.perp());
        let a = state.speed_of_sound();
        let a2 = state.speed_of_sound2;
        let r = state.density;
        [
            dr - dp / a2,
            r * dut,
            0.5 * (dp - r * a * dun) / a2,
            0.5 * (dp + r * a * dun) / a2,
        ]
    }

    fn from_characteristic(
        species: &EulerSpecies,
        normal: DVec2,
        state: &EulerState,
        dw: &Components,
    ) -> Components {
        let [entropy, vorticity, minus, plus] = *dw;
        let r_inv = 1. / state.density;
        let dp = state.speed_of_sound2 * (minus + plus);
        let dr = entropy + minus + plus;
        let dun = state.speed_of_sound() * (plus - minus) * r_inv;
        let dut = vorticity * r_inv;
        let dv = dun * normal + dut * normal.perp();
        primitive_to_conserved(species, state, &[dv.x, dv.y, dr, dp])
    }

    fn wave_speeds(_species: &EulerSpecies, normal: DVec2, state: &EulerState) -> Components {
        let un = state.velocity.dot(normal);
        let a = state.speed_of_sound();
        [un, un, un - a, un + a]
    }

    fn exact_flux(species: &EulerSpecies, face: &Surface, state: &EulerState) -> FluxResult<Euler> {
        let un = state.velocity.dot(face.normal);
        let mass_flux = state.density * un;
        let momentum_flux = mass_flux * state.velocity + state.pressure * face.normal;
        let flux = VariableDelta::new([
            momentum_flux.x,
            momentum_flux.y,
            mass_flux,
            mass_flux * state.specific_total_enthalpy,
        ]);
        FluxResult::new(
            face.area * flux,
            face.area * Self::max_wave_speed(species, face.normal, state),
        )
    }

    fn roe_average(species: &EulerSpecies, left: &EulerState, right: &EulerState) -> EulerState {
        let sqrt_l = left.density.sqrt();
        let sqrt_r = right.density.sqrt();
        let w = sqrt_l / (sqrt_l + sqrt_r);
        let velocity = w * left.velocity + (1. - w) * right.velocity;
        let enthalpy =
            w * left.specific_total_enthalpy + (1. - w) * right.specific_total_enthalpy;
        let density = sqrt_l * sqrt_r;
        let speed_of_sound2 =
            species.gamma().gm1() * (enthalpy - 0.5 * velocity.length_squared());
        let pressure = density * speed_of_sound2 * species.gamma().gamma_inv();
        EulerState::new(species, velocity, density, pressure)
    }

    fn velocity(state: &EulerState) -> DVec2 {
        state.velocity
    }

    fn quantity_names() -> &'static [&'static str] {
        &["Density", "VelocityX", "VelocityY", "Pressure", "Temperature"]
    }

    fn quantities(state: &EulerState) -> Vec<f64> {
        vec![
            state.density,
            state.velocity.x,
            state.velocity.y,
            state.pressure,
            state.temperature,
        ]
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use glam::DVec2;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn random_state(rng: &mut StdRng, species: &EulerSpecies) -> EulerState {
        EulerState::new(
            species,
            DVec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)),
            rng.gen_range(0.1..3.0),
            rng.gen_range(0.1..3.0),
        )
    }

    #[test]
    fn test_set_round_trip() {
        let species = EulerSpecies::air();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let state = random_state(&mut rng, &species);
            for basis in [BasisType::Conserved, BasisType::Primitive, BasisType::Viscous] {
                let q = Euler::state_to_set(&species, basis, &state);
                let back = Euler::set_to_state(&species, basis, &q);
                assert_approx_eq!(f64, back.density(), state.density(), epsilon = 1e-12);
                assert_approx_eq!(f64, back.pressure(), state.pressure(), epsilon = 1e-12);
                assert_approx_eq!(f64, back.velocity().x, state.velocity().x, epsilon = 1e-12);
                assert_approx_eq!(f64, back.velocity().y, state.velocity().y, epsilon = 1e-12);
                assert_approx_eq!(
                    f64,
                    back.specific_total_enthalpy(),
                    state.specific_total_enthalpy(),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_delta_jacobian_matches_finite_difference() {
        let species = EulerSpecies::air();
        let mut rng = StdRng::seed_from_u64(11);
        let eps = 1e-7;
        for _ in 0..20 {
            let state = random_state(&mut rng, &species);
            for basis in [BasisType::Primitive, BasisType::Viscous] {
                let q = Euler::state_to_set(&species, basis, &state);
                let dq: Components = [
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-0.1..0.1) * q[2],
                    rng.gen_range(-0.1..0.1) * q[3],
                ];
                let mut q_eps = q;
                for k in 0..4 {
                    q_eps[k] += eps * dq[k];
                }
                let u0 = Euler::state_to_set(
                    &species,
                    BasisType::Conserved,
                    &Euler::set_to_state(&species, basis, &q),
                );
                let u1 = Euler::state_to_set(
                    &species,
                    BasisType::Conserved,
                    &Euler::set_to_state(&species, basis, &q_eps),
                );
                let du = Euler::delta_to_conserved(&species, basis, &state, &dq);
                for k in 0..4 {
                    assert_approx_eq!(
                        f64,
                        (u1[k] - u0[k]) / eps,
                        du[k],
                        epsilon = 1e-5 * (1. + du[k].abs())
                    );
                }
                let back = Euler::delta_from_conserved(&species, basis, &state, &du);
                for k in 0..4 {
                    assert_approx_eq!(f64, back[k], dq[k], epsilon = 1e-12 * (1. + dq[k].abs()));
                }
            }
        }
    }

    #[test]
    fn test_characteristic_round_trip() {
        let species = EulerSpecies::air();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let state = random_state(&mut rng, &species);
            let normal = DVec2::from_angle(rng.gen_range(0.0..6.28));
            let du: Components = [
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            ];
            let dw = Euler::to_characteristic(&species, normal, &state, &du);
            let back = Euler::from_characteristic(&species, normal, &state, &dw);
            for k in 0..4 {
                assert_approx_eq!(f64, back[k], du[k], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_exact_flux() {
        let species = EulerSpecies::air();
        let state = EulerState::new(&species, DVec2::new(2., 0.), 1., 1.);
        let face = Surface::new(0.5, DVec2::ZERO, DVec2::X);
        let flux = Euler::exact_flux(&species, &face, &state);
        assert_approx_eq!(f64, flux.flux[2], 1.);
        assert_approx_eq!(f64, flux.flux[0], 0.5 * (4. + 1.));
        assert_approx_eq!(f64, flux.flux[1], 0.);
        assert_approx_eq!(f64, flux.flux[3], 0.5 * 2. * (3.5 + 2.), epsilon = 1e-14);
        assert_approx_eq!(f64, flux.lambda, 0.5 * (2. + 1.4f64.sqrt()));
    }

    #[test]
    fn test_roe_average_of_equal_states() {
        let species = EulerSpecies::air();
        let state = EulerState::new(&species, DVec2::new(0.3, -0.2), 0.8, 1.7);
        let average = Euler::roe_average(&species, &state, &state);
        assert_approx_eq!(f64, average.density(), 0.8, epsilon = 1e-14);
        assert_approx_eq!(f64, average.pressure(), 1.7, epsilon = 1e-14);
    }
}
