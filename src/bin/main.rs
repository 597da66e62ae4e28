use std::{error::Error, fs, path::PathBuf};

use clap::Parser;
use conslaw_fv::{
    conservation_law::{
        BasisType, Conserved, ConservationLaw, Euler, LawType, Primitive, ScalarAdvection,
        ScalarSpecies, SetBasis, Viscous,
    },
    gas_law::EulerSpecies,
    integrate,
    riemann_solver::FluxKind,
    slope_limiters::Limiter,
    snapshot::write_snapshot,
    utils::parse_f64_list,
    BoundaryRegistry, BoundaryType, ConfigError, Dimensionality, ExecutionPolicy,
    InitialConditions, Mesh, MusclFlux, RungeKutta, SolutionField, TimeControls,
};
use glam::DVec2;
use log::{info, warn};
use yaml_rust::{Yaml, YamlLoader};

struct MeshCfg {
    cells: Vec<usize>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    perturbation: Option<f64>,
    seed: u64,
}

impl MeshCfg {
    fn parse(yaml: &Yaml) -> Result<Self, ConfigError> {
        let cells = yaml["cells"]
            .as_vec()
            .ok_or(ConfigError::MissingParameter("mesh:cells".to_string()))?
            .iter()
            .map(|n| n.as_i64().filter(|&n| n > 0).map(|n| n as usize))
            .collect::<Option<Vec<_>>>()
            .ok_or(ConfigError::MissingParameter("mesh:cells".to_string()))?;
        if cells.is_empty() || cells.len() > 2 {
            return Err(ConfigError::InvalidArrayLength(2, cells.len()));
        }
        Ok(Self {
            lower: parse_f64_list(&yaml["lower"], "mesh:lower", cells.len())?,
            upper: parse_f64_list(&yaml["upper"], "mesh:upper", cells.len())?,
            perturbation: yaml["perturbation"].as_f64(),
            seed: yaml["seed"].as_i64().unwrap_or(0) as u64,
            cells,
        })
    }

    fn build(&self) -> Result<Mesh, Box<dyn Error>> {
        let mesh = match self.cells[..] {
            [n] => Mesh::uniform_1d(n, self.lower[0], self.upper[0])?,
            [nx, ny] => {
                let lower = DVec2::new(self.lower[0], self.lower[1]);
                let upper = DVec2::new(self.upper[0], self.upper[1]);
                match self.perturbation {
                    Some(amplitude) => Mesh::cartesian_2d_perturbed(
                        [nx, ny],
                        lower,
                        upper,
                        amplitude,
                        self.seed,
                    )?,
                    None => Mesh::cartesian_2d([nx, ny], lower, upper)?,
                }
            }
            _ => return Err(ConfigError::InvalidArrayLength(2, self.cells.len()).into()),
        };
        Ok(mesh)
    }

    fn dimensionality(&self) -> Dimensionality {
        match self.cells.len() {
            1 => Dimensionality::OneD,
            _ => Dimensionality::TwoD,
        }
    }
}

struct DiscretizationCfg {
    flux: FluxKind,
    limiter: Limiter,
    basis: BasisType,
    policy: ExecutionPolicy,
    threads: Option<usize>,
}

impl DiscretizationCfg {
    fn parse(yaml: &Yaml) -> Result<Self, ConfigError> {
        Ok(Self {
            flux: FluxKind::init(yaml)?,
            limiter: Limiter::init(yaml)?,
            basis: BasisType::from_name(yaml["basis"].as_str().unwrap_or("conserved"))?,
            policy: ExecutionPolicy::init(&yaml["policy"])?,
            threads: yaml["threads"].as_i64().map(|n| n.max(1) as usize),
        })
    }
}

struct Config {
    law: LawType,
    species: Yaml,
    mesh: MeshCfg,
    controls: TimeControls,
    scheme: RungeKutta,
    discretization: DiscretizationCfg,
    boundaries: Vec<BoundaryType>,
    initial_conditions: InitialConditions,
    output: PathBuf,
}

impl Config {
    fn parse(file: PathBuf) -> Result<Self, Box<dyn Error>> {
        let docs = YamlLoader::load_from_str(&fs::read_to_string(file)?)?;
        let config_yml = docs
            .first()
            .ok_or(ConfigError::MissingParameter("configuration".to_string()))?;

        let law = config_yml["law"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("law".to_string()))?;
        let mesh = MeshCfg::parse(&config_yml["mesh"])?;
        let boundaries = BoundaryType::init(&config_yml["boundaries"], mesh.dimensionality())?;
        let output = config_yml["output"]["filename"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("output:filename".to_string()))?;

        Ok(Self {
            law: LawType::from_name(law)?,
            species: config_yml["species"].clone(),
            mesh,
            controls: TimeControls::init(&config_yml["time_integration"])?,
            scheme: RungeKutta::init(&config_yml["time_integration"])?,
            discretization: DiscretizationCfg::parse(&config_yml["discretization"])?,
            boundaries,
            initial_conditions: InitialConditions::init(&config_yml["initial_conditions"])?,
            output: PathBuf::from(output),
        })
    }
}

#[derive(Parser)]
pub struct Cli {
    /// The path to the config file to read
    #[clap(parse(from_os_str))]
    pub config: PathBuf,
}

fn run<L: ConservationLaw, B: SetBasis>(
    config: &Config,
    mesh: &Mesh,
    species: &L::Species,
    muscl: MusclFlux<L>,
    registry: BoundaryRegistry<L>,
    field: &mut SolutionField<L, B>,
) -> Result<(), Box<dyn Error>> {
    info!(
        "Running {} in {} variables with {} fluxes, {} and {}",
        L::TYPE.label(),
        B::NAME,
        config.discretization.flux.label(),
        muscl.limiter().label(),
        config.scheme.name()
    );
    let report = integrate(
        config.discretization.policy,
        &config.controls,
        &config.scheme,
        &muscl,
        &registry,
        species,
        mesh,
        field,
    )?;
    if !field.is_finite() {
        warn!("Writing a snapshot with non finite values");
    }
    write_snapshot(&config.output, species, mesh, field, &report)?;
    info!("Snapshot written to {}", config.output.display());
    Ok(())
}

fn run_euler<B: SetBasis>(config: &Config, mesh: &Mesh) -> Result<(), Box<dyn Error>> {
    let species = EulerSpecies::init(&config.species)?;
    let interior = config.initial_conditions.euler::<B>(&species, mesh)?;
    let mut field = SolutionField::new(mesh.dimensionality(), interior, config.boundaries.clone())?;
    let muscl = MusclFlux::new(
        config.discretization.limiter,
        config.discretization.flux.euler_solver(),
    );
    run::<Euler, B>(
        config,
        mesh,
        &species,
        muscl,
        BoundaryRegistry::standard(),
        &mut field,
    )
}

fn run_scalar_advection<B: SetBasis>(config: &Config, mesh: &Mesh) -> Result<(), Box<dyn Error>> {
    let interior = config.initial_conditions.scalar_advection::<B>(mesh)?;
    let mut field = SolutionField::new(mesh.dimensionality(), interior, config.boundaries.clone())?;
    let muscl = MusclFlux::new(
        config.discretization.limiter,
        config.discretization.flux.scalar_advection_solver()?,
    );
    run::<ScalarAdvection, B>(
        config,
        mesh,
        &ScalarSpecies,
        muscl,
        BoundaryRegistry::standard(),
        &mut field,
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // parse command line parameters
    let args = Cli::parse();

    // read configuration
    let config = Config::parse(args.config)?;
    if let Some(threads) = config.discretization.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    // Setup simulation
    let mesh = config.mesh.build()?;

    // run
    match (config.law, config.discretization.basis) {
        (LawType::Euler, BasisType::Conserved) => run_euler::<Conserved>(&config, &mesh)?,
        (LawType::Euler, BasisType::Primitive) => run_euler::<Primitive>(&config, &mesh)?,
        (LawType::Euler, BasisType::Viscous) => run_euler::<Viscous>(&config, &mesh)?,
        (LawType::ScalarAdvection, BasisType::Conserved) => {
            run_scalar_advection::<Conserved>(&config, &mesh)?
        }
        (LawType::ScalarAdvection, BasisType::Primitive) => {
            run_scalar_advection::<Primitive>(&config, &mesh)?
        }
        (LawType::ScalarAdvection, BasisType::Viscous) => {
            run_scalar_advection::<Viscous>(&config, &mesh)?
        }
    }

    info!("Done!");
    Ok(())
}
