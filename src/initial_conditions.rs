use std::f64::consts::PI;

use glam::DVec2;
use ndarray::Array2;
use yaml_rust::Yaml;

use crate::{
    conservation_law::{
        ConservationLaw, Euler, EulerState, ScalarAdvection, ScalarSpecies, ScalarState, SetBasis,
    },
    errors::ConfigError,
    gas_law::EulerSpecies,
    geometry::Point,
    mesh::Mesh,
    physical_quantities::VariableSet,
    utils::parse_dvec2,
};

/// Riemann problems with the diaphragm halfway the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShockTube {
    Sod,
    /// Pressure ratio close to one at room temperature.
    LowMach,
}

impl ShockTube {
    /// Left and right state.
    pub fn states(&self, species: &EulerSpecies) -> (EulerState, EulerState) {
        match self {
            ShockTube::Sod => (
                EulerState::new(species, DVec2::ZERO, 1., 1.),
                EulerState::new(species, DVec2::ZERO, 0.125, 0.1),
            ),
            ShockTube::LowMach => {
                let temperature = 300.;
                let pl = 100028.04;
                let pr = 100000.;
                (
                    EulerState::new(
                        species,
                        DVec2::ZERO,
                        pl / (species.gas_constant * temperature),
                        pl,
                    ),
                    EulerState::new(
                        species,
                        DVec2::ZERO,
                        pr / (species.gas_constant * temperature),
                        pr,
                    ),
                )
            }
        }
    }
}

/// Isentropic right running sound wave on a uniform flow with unit velocity and density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Soundwave {
    pub mach: f64,
    pub amplitude: f64,
    pub n_wavelengths: usize,
}

impl Soundwave {
    /// Speed of sound of the background flow.
    pub fn background_sound_speed(&self) -> f64 {
        1. / self.mach
    }

    pub fn background_pressure(&self, species: &EulerSpecies) -> f64 {
        let a0 = self.background_sound_speed();
        a0 * a0 / species.gamma().gamma()
    }

    /// Time for the wave to travel once through a domain of `length`.
    pub fn crossing_time(&self, length: f64) -> f64 {
        length / (1. + self.background_sound_speed())
    }

    pub fn state(&self, species: &EulerSpecies, x: f64, length: f64) -> EulerState {
        let gamma = species.gamma();
        let a0 = self.background_sound_speed();
        let p0 = self.background_pressure(species);
        let kappa = 2. * PI * self.n_wavelengths as f64 / length;

        let pressure = p0 * (1. + self.mach * self.amplitude * (kappa * x).sin());
        let density = (pressure / p0).powf(gamma.gamma_inv());
        let a = (gamma.gamma() * pressure / density).sqrt();
        // u - 2a / (gamma - 1) is constant through a right running simple wave.
        let velocity = 1. + (a - a0) * gamma.tdgm1();
        EulerState::new(species, velocity * DVec2::X, density, pressure)
    }
}

/// Shape of a localized perturbation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    TopHat,
    Gaussian,
}

/// Perturbation inside the rectangle `[lower, upper]`, carried by a uniform flow of `speed`
/// at angle `theta` with the x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bump {
    pub profile: Profile,
    pub theta: f64,
    pub speed: f64,
    pub lower: DVec2,
    pub upper: DVec2,
}

impl Bump {
    pub fn velocity(&self) -> DVec2 {
        self.speed * DVec2::from_angle(self.theta)
    }

    /// Perturbation between 0 and 1 at `x`.
    pub fn shape(&self, x: Point) -> f64 {
        match self.profile {
            Profile::TopHat => {
                let inside = x.cmpgt(self.lower).all() && x.cmplt(self.upper).all();
                if inside {
                    1.
                } else {
                    0.
                }
            }
            Profile::Gaussian => {
                let centre = 0.5 * (self.lower + self.upper);
                let width = 0.5 * (self.upper - self.lower);
                let z = (x - centre) / width;
                (-0.5 * z.length_squared()).exp()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialConditions {
    ShockTube(ShockTube),
    Soundwave(Soundwave),
    /// Euler density perturbation of 5% at constant pressure, the Mach number of the
    /// background flow is the reference Mach number of the species.
    DensityBump(Bump),
    /// Scalar advection of a unit perturbation.
    ScalarBump(Bump),
}

impl InitialConditions {
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let kind = cfg["kind"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("initial_conditions:kind".to_string()))?;
        let bump = |profile| -> Result<Bump, ConfigError> {
            Ok(Bump {
                profile,
                theta: cfg["theta"].as_f64().unwrap_or(0.),
                speed: cfg["speed"].as_f64().unwrap_or(1.),
                lower: parse_dvec2(&cfg["lower"], "initial_conditions:lower")?,
                upper: parse_dvec2(&cfg["upper"], "initial_conditions:upper")?,
            })
        };
        match kind {
            "sod" => Ok(Self::ShockTube(ShockTube::Sod)),
            "low_mach" => Ok(Self::ShockTube(ShockTube::LowMach)),
            "soundwave" => Ok(Self::Soundwave(Soundwave {
                mach: cfg["mach"].as_f64().unwrap_or(1e-8),
                amplitude: cfg["amplitude"].as_f64().unwrap_or(0.1),
                n_wavelengths: cfg["n_wavelengths"].as_i64().unwrap_or(1).max(1) as usize,
            })),
            "density_tophat" => Ok(Self::DensityBump(bump(Profile::TopHat)?)),
            "density_gaussian" => Ok(Self::DensityBump(bump(Profile::Gaussian)?)),
            "scalar_tophat" => Ok(Self::ScalarBump(bump(Profile::TopHat)?)),
            "scalar_gaussian" => Ok(Self::ScalarBump(bump(Profile::Gaussian)?)),
            _ => Err(ConfigError::UnknownCase(kind.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ShockTube(ShockTube::Sod) => "sod",
            Self::ShockTube(ShockTube::LowMach) => "low_mach",
            Self::Soundwave(_) => "soundwave",
            Self::DensityBump(_) => "density_bump",
            Self::ScalarBump(_) => "scalar_bump",
        }
    }

    fn unsupported<L: ConservationLaw>(&self) -> ConfigError {
        ConfigError::UnsupportedCase(self.label().to_string(), L::TYPE.label())
    }

    pub fn euler<B: SetBasis>(
        &self,
        species: &EulerSpecies,
        mesh: &Mesh,
    ) -> Result<Array2<VariableSet<Euler, B>>, ConfigError> {
        if let Self::ScalarBump(_) = self {
            return Err(self.unsupported::<Euler>());
        }
        let nodes = mesh.nodes();
        let (ni, nj) = nodes.dim();
        let lower = nodes[[0, 0]];
        let length = nodes[[ni - 1, nj - 1]].x - lower.x;

        Ok(mesh.cells().map(|cell| {
            let x = cell.centroid;
            let state = match self {
                Self::ShockTube(tube) => {
                    let (left, right) = tube.states(species);
                    if x.x < lower.x + 0.5 * length {
                        left
                    } else {
                        right
                    }
                }
                Self::Soundwave(wave) => wave.state(species, x.x - lower.x, length),
                Self::DensityBump(bump) | Self::ScalarBump(bump) => {
                    let a = bump.speed / species.minf;
                    let pressure = a * a / species.gamma().gamma();
                    let density = 1. + 0.05 * bump.shape(x);
                    EulerState::new(species, bump.velocity(), density, pressure)
                }
            };
            VariableSet::from_state(species, &state)
        }))
    }

    pub fn scalar_advection<B: SetBasis>(
        &self,
        mesh: &Mesh,
    ) -> Result<Array2<VariableSet<ScalarAdvection, B>>, ConfigError> {
        match self {
            Self::ScalarBump(bump) => Ok(mesh.cells().map(|cell| {
                let state = ScalarState {
                    velocity: bump.velocity(),
                    scalar: bump.shape(cell.centroid),
                };
                VariableSet::from_state(&ScalarSpecies, &state)
            })),
            _ => Err(self.unsupported::<ScalarAdvection>()),
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use yaml_rust::YamlLoader;

    use super::*;
    use crate::conservation_law::Primitive;

    #[test]
    fn test_sod() {
        let species = EulerSpecies::air();
        let mesh = Mesh::uniform_1d(8, 0., 1.).unwrap();
        let q = InitialConditions::ShockTube(ShockTube::Sod)
            .euler::<Primitive>(&species, &mesh)
            .unwrap();
        assert_eq!(q[[3, 0]].to_state(&species).density(), 1.);
        assert_eq!(q[[4, 0]].to_state(&species).density(), 0.125);
        assert_eq!(q[[7, 0]].to_state(&species).pressure(), 0.1);
    }

    #[test]
    fn test_soundwave_is_isentropic() {
        let species = EulerSpecies::air();
        let wave = Soundwave {
            mach: 1e-2,
            amplitude: 0.1,
            n_wavelengths: 1,
        };
        let background = wave.state(&species, 0., 1.);
        assert_approx_eq!(f64, background.velocity().x, 1., epsilon = 1e-12);
        assert_approx_eq!(f64, background.speed_of_sound(), 100., epsilon = 1e-9);
        let entropy = species.entropy(background.pressure(), background.density());
        for x in [0.1, 0.3, 0.77] {
            let state = wave.state(&species, x, 1.);
            assert_approx_eq!(
                f64,
                species.entropy(state.pressure(), state.density()) / entropy,
                1.,
                epsilon = 1e-12
            );
        }
        assert_approx_eq!(f64, wave.crossing_time(1.), 1. / 101.);
    }

    #[test]
    fn test_bumps() {
        let cfg = &YamlLoader::load_from_str(
            "kind: scalar_tophat\ntheta: 0.\nspeed: 2.\nlower: [0.25, 0.25]\nupper: [0.75, 0.75]",
        )
        .unwrap()[0];
        let ics = InitialConditions::init(cfg).unwrap();
        let mesh = Mesh::cartesian_2d([4, 4], DVec2::ZERO, DVec2::ONE).unwrap();
        let q = ics.scalar_advection::<Primitive>(&mesh).unwrap();
        assert_eq!(q[[0, 0]][2], 0.);
        assert_eq!(q[[1, 2]][2], 1.);
        assert_eq!(q[[2, 2]][0], 2.);
        assert!(matches!(
            ics.euler::<Primitive>(&EulerSpecies::air(), &mesh),
            Err(ConfigError::UnsupportedCase(..))
        ));

        let InitialConditions::ScalarBump(tophat) = ics else {
            panic!("expected a scalar bump");
        };
        let gaussian = Bump {
            profile: Profile::Gaussian,
            ..tophat
        };
        assert_approx_eq!(f64, gaussian.shape(DVec2::splat(0.5)), 1.);
    }

    #[test]
    fn test_init() {
        let cfg = &YamlLoader::load_from_str("kind: soundwave\nmach: 0.01").unwrap()[0];
        assert_eq!(
            InitialConditions::init(cfg).unwrap(),
            InitialConditions::Soundwave(Soundwave {
                mach: 0.01,
                amplitude: 0.1,
                n_wavelengths: 1
            })
        );
        let cfg = &YamlLoader::load_from_str("kind: blast").unwrap()[0];
        assert!(InitialConditions::init(cfg).is_err());
        let cfg = &YamlLoader::load_from_str("kind: density_tophat").unwrap()[0];
        assert!(InitialConditions::init(cfg).is_err());
    }
}
