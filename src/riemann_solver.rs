//! Numerical flux functors.
//!
//! Every solver maps a pair of states on both sides of a face to the flux through that face
//! (scaled by the face area) and the spectral radius of the face. All solvers are consistent:
//! for equal left and right states they return the exact flux of the law.

use yaml_rust::Yaml;

use crate::{
    conservation_law::{ConservationLaw, Euler, ScalarAdvection, SetBasis},
    errors::ConfigError,
    flux::FluxResult,
    geometry::Surface,
    physical_quantities::VariableSet,
};

mod ausm_plus_up;
mod central;
mod hllc;
mod roe;
mod rusanov;
mod slau;

pub use ausm_plus_up::AusmPlusUpRiemannSolver;
pub use central::CentralRiemannSolver;
pub use hllc::HLLCRiemannSolver;
pub use roe::RoeRiemannSolver;
pub use rusanov::RusanovRiemannSolver;
pub use slau::SlauRiemannSolver;

pub trait RiemannFluxSolver<L: ConservationLaw>: Send + Sync {
    fn flux_states(
        &self,
        species: &L::Species,
        face: &Surface,
        left: &L::State,
        right: &L::State,
    ) -> FluxResult<L>;

    fn flux<B: SetBasis>(
        &self,
        species: &L::Species,
        face: &Surface,
        left: &VariableSet<L, B>,
        right: &VariableSet<L, B>,
    ) -> FluxResult<L>
    where
        Self: Sized,
    {
        self.flux_states(
            species,
            face,
            &left.to_state(species),
            &right.to_state(species),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluxKind {
    Central,
    Rusanov,
    Roe,
    Hllc,
    AusmPlusUp,
    Slau,
}

impl FluxKind {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "central" => Ok(FluxKind::Central),
            "rusanov" => Ok(FluxKind::Rusanov),
            "roe" => Ok(FluxKind::Roe),
            "hllc" | "HLLC" => Ok(FluxKind::Hllc),
            "ausm+up" | "ausm_plus_up" => Ok(FluxKind::AusmPlusUp),
            "slau" => Ok(FluxKind::Slau),
            _ => Err(ConfigError::UnknownFlux(name.to_string())),
        }
    }

    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let name = cfg["flux"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("discretization:flux".to_string()))?;
        Self::from_name(name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FluxKind::Central => "central",
            FluxKind::Rusanov => "rusanov",
            FluxKind::Roe => "roe",
            FluxKind::Hllc => "hllc",
            FluxKind::AusmPlusUp => "ausm+up",
            FluxKind::Slau => "slau",
        }
    }

    pub fn all() -> [FluxKind; 6] {
        [
            FluxKind::Central,
            FluxKind::Rusanov,
            FluxKind::Roe,
            FluxKind::Hllc,
            FluxKind::AusmPlusUp,
            FluxKind::Slau,
        ]
    }

    pub fn euler_solver(&self) -> Box<dyn RiemannFluxSolver<Euler>> {
        match self {
            FluxKind::Central => Box::new(CentralRiemannSolver),
            FluxKind::Rusanov => Box::new(RusanovRiemannSolver),
            FluxKind::Roe => Box::new(RoeRiemannSolver),
            FluxKind::Hllc => Box::new(HLLCRiemannSolver),
            FluxKind::AusmPlusUp => Box::new(AusmPlusUpRiemannSolver),
            FluxKind::Slau => Box::new(SlauRiemannSolver),
        }
    }

    pub fn scalar_advection_solver(
        &self,
    ) -> Result<Box<dyn RiemannFluxSolver<ScalarAdvection>>, ConfigError> {
        match self {
            FluxKind::Central => Ok(Box::new(CentralRiemannSolver)),
            FluxKind::Rusanov => Ok(Box::new(RusanovRiemannSolver)),
            FluxKind::Roe => Ok(Box::new(RoeRiemannSolver)),
            _ => Err(ConfigError::UnsupportedFlux(
                self.label().to_string(),
                ScalarAdvection::TYPE.label(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use glam::DVec2;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use yaml_rust::YamlLoader;

    use super::*;
    use crate::{
        conservation_law::{EulerState, Primitive, ScalarSpecies, ScalarState},
        gas_law::EulerSpecies,
    };

    fn random_face(rng: &mut StdRng) -> Surface {
        Surface::new(
            rng.gen_range(0.1..2.0),
            DVec2::ZERO,
            DVec2::from_angle(rng.gen_range(0.0..std::f64::consts::TAU)),
        )
    }

    #[test]
    fn test_euler_consistency() {
        let species = EulerSpecies::new(1.4, 287.058, 0.7, 0.3, 1.81e-5);
        let mut rng = StdRng::seed_from_u64(7);
        for kind in FluxKind::all() {
            let solver = kind.euler_solver();
            for _ in 0..50 {
                let face = random_face(&mut rng);
                let state = EulerState::new(
                    &species,
                    DVec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)),
                    rng.gen_range(0.1..3.0),
                    rng.gen_range(0.1..3.0),
                );
                let exact = Euler::exact_flux(&species, &face, &state);
                let flux = solver.flux_states(&species, &face, &state, &state);
                for k in 0..4 {
                    assert_approx_eq!(
                        f64,
                        flux.flux[k],
                        exact.flux[k],
                        epsilon = 1e-12 * (1. + exact.flux[k].abs())
                    );
                }
                assert!(flux.lambda >= exact.lambda * (1. - 1e-12));
            }
        }
    }

    #[test]
    fn test_scalar_consistency() {
        let mut rng = StdRng::seed_from_u64(8);
        for kind in [FluxKind::Central, FluxKind::Rusanov, FluxKind::Roe] {
            let solver = kind.scalar_advection_solver().unwrap();
            for _ in 0..20 {
                let face = random_face(&mut rng);
                let state = ScalarState::new(
                    DVec2::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0)),
                    rng.gen_range(-1.0..1.0),
                );
                let exact = ScalarAdvection::exact_flux(&ScalarSpecies, &face, &state);
                let flux = solver.flux_states(&ScalarSpecies, &face, &state, &state);
                for k in 0..3 {
                    assert_approx_eq!(f64, flux.flux[k], exact.flux[k], epsilon = 1e-14);
                }
                assert_approx_eq!(f64, flux.lambda, exact.lambda, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_mirror_symmetry() {
        // Swapping left and right while flipping the normal must negate the flux.
        let species = EulerSpecies::air();
        let left = EulerState::new(&species, DVec2::new(0.3, 0.1), 1., 1.);
        let right = EulerState::new(&species, DVec2::new(-0.2, 0.4), 0.4, 0.3);
        let face = Surface::new(1.5, DVec2::ZERO, DVec2::new(0.6, 0.8));
        for kind in FluxKind::all() {
            let solver = kind.euler_solver();
            let forward = solver.flux_states(&species, &face, &left, &right);
            let backward = solver.flux_states(&species, &face.flipped(), &right, &left);
            for k in 0..4 {
                assert_approx_eq!(f64, forward.flux[k], -backward.flux[k], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_flux_from_variable_sets() {
        let species = EulerSpecies::air();
        let face = Surface::new(1., DVec2::ZERO, DVec2::X);
        let left = VariableSet::<Euler, Primitive>::new([0.1, 0., 1., 1.]);
        let right = VariableSet::<Euler, Primitive>::new([0., 0., 0.125, 0.1]);
        let from_sets = RoeRiemannSolver.flux(&species, &face, &left, &right);
        let from_states: FluxResult<Euler> = RoeRiemannSolver.flux_states(
            &species,
            &face,
            &left.to_state(&species),
            &right.to_state(&species),
        );
        assert_eq!(from_sets, from_states);
    }

    #[test]
    fn test_scalar_upwinding() {
        let face = Surface::new(1., DVec2::ZERO, DVec2::X);
        let left = ScalarState::new(DVec2::new(2., 0.), 1.);
        let right = ScalarState::new(DVec2::new(2., 0.), 3.);
        let flux: FluxResult<ScalarAdvection> =
            RoeRiemannSolver.flux_states(&ScalarSpecies, &face, &left, &right);
        assert_approx_eq!(f64, flux.flux[2], 2.);
        assert_approx_eq!(f64, flux.flux[0], 0.);
        assert_approx_eq!(f64, flux.lambda, 2.);
    }

    #[test]
    fn test_init() {
        let cfg = &YamlLoader::load_from_str("flux: ausm+up").unwrap()[0];
        assert_eq!(FluxKind::init(cfg).unwrap(), FluxKind::AusmPlusUp);
        assert!(FluxKind::from_name("exact").is_err());
        assert!(FluxKind::Slau.scalar_advection_solver().is_err());
    }
}
