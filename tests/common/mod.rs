#![allow(dead_code)]

use conslaw_fv::{
    conservation_law::{ConservationLaw, Conserved, SetBasis},
    gas_law::EulerSpecies,
    riemann_solver::FluxKind,
    slope_limiters::Limiter,
    BoundaryType, Dimensionality, InitialConditions, Mesh, RungeKutta, SolutionField,
    TimeControls,
};
use yaml_rust::{Yaml, YamlLoader};

pub const SPECIES_CONFIG: &'static str = r##"
gamma: 1.4
gas_constant: 287.058
minf: 0.5
"##;

pub const SOD_CONFIG: &'static str = r##"
kind: "sod"
"##;

pub const SOUNDWAVE_CONFIG: &'static str = r##"
kind: "soundwave"
mach: 1e-8
amplitude: 0.1
n_wavelengths: 1
"##;

pub const DENSITY_BUMP_CONFIG: &'static str = r##"
kind: "density_gaussian"
theta: 0.4
speed: 0.5
lower: [0.3, 0.3]
upper: [0.7, 0.7]
"##;

pub const SCALAR_BUMP_CONFIG: &'static str = r##"
kind: "scalar_tophat"
theta: 0.7
speed: 1.
lower: [0.25, 0.25]
upper: [0.6, 0.75]
"##;

pub const SOD_TIME_INTEGRATION_CONFIG: &'static str = r##"
scheme: "ssp34"
n_timesteps: 480
cfl: 0.8
"##;

pub const SHORT_TIME_INTEGRATION_CONFIG: &'static str = r##"
scheme: "ssp33"
n_timesteps: 5
cfl: 0.5
"##;

pub fn load(cfg: &str) -> Yaml {
    YamlLoader::load_from_str(cfg).unwrap().remove(0)
}

pub fn get_species() -> EulerSpecies {
    EulerSpecies::init(&load(SPECIES_CONFIG)).unwrap()
}

pub fn get_initial_conditions(cfg: &str) -> InitialConditions {
    InitialConditions::init(&load(cfg)).unwrap()
}

pub fn get_controls(cfg: &str) -> (TimeControls, RungeKutta) {
    let yaml = load(cfg);
    (
        TimeControls::init(&yaml).unwrap(),
        RungeKutta::init(&yaml).unwrap(),
    )
}

/// Unit square, nodes displaced by up to 20% of the cell size.
pub fn get_perturbed_mesh(shape: [usize; 2]) -> Mesh {
    Mesh::cartesian_2d_perturbed(shape, glam::DVec2::ZERO, glam::DVec2::ONE, 0.2, 42).unwrap()
}

pub fn euler_field<B: SetBasis>(
    ics: &InitialConditions,
    species: &EulerSpecies,
    mesh: &Mesh,
    bc_types: Vec<BoundaryType>,
) -> SolutionField<conslaw_fv::conservation_law::Euler, B> {
    let interior = ics.euler::<B>(species, mesh).unwrap();
    SolutionField::new(mesh.dimensionality(), interior, bc_types).unwrap()
}

pub fn periodic(dimensionality: Dimensionality) -> Vec<BoundaryType> {
    vec![BoundaryType::Periodic; dimensionality.n_boundaries()]
}

/// Volume weighted sum of the conserved variables.
pub fn total_conserved<L: ConservationLaw, B: SetBasis>(
    species: &L::Species,
    mesh: &Mesh,
    field: &SolutionField<L, B>,
) -> [f64; 4] {
    let mut total = [0.; 4];
    for (q, cell) in field.interior().iter().zip(mesh.cells().iter()) {
        let u = q.convert::<Conserved>(species);
        for (t, c) in total.iter_mut().zip(u.components().iter()) {
            *t += c * cell.volume;
        }
    }
    total
}

/// Pairs of numerical flux and limiter exercised by the end to end tests.
pub fn discretizations() -> Vec<(FluxKind, Limiter)> {
    FluxKind::all()
        .into_iter()
        .flat_map(|flux| {
            [Limiter::NoLimit3, Limiter::VanAlbada2, Limiter::Cada3]
                .into_iter()
                .map(move |limiter| (flux, limiter))
        })
        .collect()
}
