//! Explicit strong stability preserving Runge-Kutta integration.
//!
//! A scheme with `s` stages is stored as a pair of tables: stage `i` produces
//! `u_{i+1} = u_0 + beta[i] * dt * sum_{k <= i} alpha[i][k] * R(u_k)`.

use std::ops::{Add, Mul};

use log::{debug, info, trace, warn};
use ndarray::Array2;
use yaml_rust::Yaml;

use crate::{
    boundary::BoundaryRegistry,
    conservation_law::{Conserved, ConservationLaw, SetBasis},
    errors::{ConfigError, EngineError},
    gradients::LeastSquaresMetric,
    mesh::Mesh,
    muscl::MusclFlux,
    parallel::ExecutionPolicy,
    physical_quantities::{VariableDelta, VariableSet},
    residual::residual,
    solution_field::SolutionField,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RungeKutta {
    name: &'static str,
    order: usize,
    max_cfl: f64,
    beta: Vec<f64>,
    alpha: Vec<Vec<f64>>,
}

impl RungeKutta {
    pub fn ssp11() -> Self {
        Self {
            name: "ssp11",
            order: 1,
            max_cfl: 1.,
            beta: vec![1.],
            alpha: vec![vec![1.]],
        }
    }

    pub fn ssp22() -> Self {
        Self {
            name: "ssp22",
            order: 2,
            max_cfl: 1.,
            beta: vec![1., 1.],
            alpha: vec![vec![1.], vec![0.5, 0.5]],
        }
    }

    pub fn ssp33() -> Self {
        Self {
            name: "ssp33",
            order: 3,
            max_cfl: 1.,
            beta: vec![1., 0.5, 1.],
            alpha: vec![vec![1.], vec![0.5, 0.5], vec![1. / 6., 1. / 6., 2. / 3.]],
        }
    }

    /// Four stage, third order scheme with an SSP coefficient of 2.
    pub fn ssp34() -> Self {
        Self {
            name: "ssp34",
            order: 3,
            max_cfl: 2.,
            beta: vec![0.5, 1., 0.5, 1.],
            alpha: vec![
                vec![1.],
                vec![0.5, 0.5],
                vec![1. / 3., 1. / 3., 1. / 3.],
                vec![1. / 6., 1. / 6., 1. / 6., 0.5],
            ],
        }
    }

    /// The classical fourth order scheme. Not SSP.
    pub fn rk4() -> Self {
        Self {
            name: "rk4",
            order: 4,
            max_cfl: 1.,
            beta: vec![0.5, 0.5, 1., 1.],
            alpha: vec![
                vec![1.],
                vec![0., 1.],
                vec![0., 0., 1.],
                vec![1. / 6., 1. / 3., 1. / 3., 1. / 6.],
            ],
        }
    }

    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "ssp11" | "euler" => Ok(Self::ssp11()),
            "ssp22" => Ok(Self::ssp22()),
            "ssp33" => Ok(Self::ssp33()),
            "ssp34" => Ok(Self::ssp34()),
            "rk4" => Ok(Self::rk4()),
            _ => Err(ConfigError::UnknownScheme(name.to_string())),
        }
    }

    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let name = cfg["scheme"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("time_integration:scheme".to_string()))?;
        Self::from_name(name)
    }

    pub fn all() -> [Self; 5] {
        [
            Self::ssp11(),
            Self::ssp22(),
            Self::ssp33(),
            Self::ssp34(),
            Self::rk4(),
        ]
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Nominal order of accuracy.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Largest CFL number for which the scheme is expected to be stable.
    pub fn max_cfl(&self) -> f64 {
        self.max_cfl
    }

    pub fn n_stages(&self) -> usize {
        self.beta.len()
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    pub fn alpha(&self) -> &[Vec<f64>] {
        &self.alpha
    }

    /// Advance `du/dt = f(u)` from `u0` by one step of size `dt`.
    pub fn integrate_ode<V, F>(&self, u0: &V, dt: f64, f: F) -> V
    where
        V: Clone + Add<Output = V> + Mul<f64, Output = V>,
        F: Fn(&V) -> V,
    {
        let mut u = u0.clone();
        let mut derivatives = Vec::with_capacity(self.n_stages());
        for (beta, alpha) in self.beta.iter().zip(self.alpha.iter()) {
            derivatives.push(f(&u));
            let mut increment = derivatives[0].clone() * alpha[0];
            for (derivative, a) in derivatives.iter().zip(alpha.iter()).skip(1) {
                increment = increment + derivative.clone() * *a;
            }
            u = u0.clone() + increment * (beta * dt);
        }
        u
    }
}

/// Step count, CFL number and optional end time of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeControls {
    pub n_timesteps: usize,
    pub cfl: f64,
    /// When set, the run stops once this time is reached, the last step landing on it.
    pub t_end: Option<f64>,
}

impl TimeControls {
    pub fn new(n_timesteps: usize, cfl: f64, t_end: Option<f64>) -> Self {
        Self {
            n_timesteps,
            cfl,
            t_end,
        }
    }

    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let n_timesteps = cfg["n_timesteps"].as_i64().ok_or(ConfigError::MissingParameter(
            "time_integration:n_timesteps".to_string(),
        ))?;
        let cfl = cfg["cfl"]
            .as_f64()
            .ok_or(ConfigError::MissingParameter("time_integration:cfl".to_string()))?;
        Ok(Self::new(
            n_timesteps.max(0) as usize,
            cfl,
            cfg["t_end"].as_f64(),
        ))
    }
}

/// Phases of a single time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestepPhase {
    /// Base state saved, timestep not yet known.
    Init,
    /// Residual of stage `s` being assembled and applied.
    Stage(usize),
    /// Last stage applied, the field is the base state of the next step.
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationReport {
    pub steps: usize,
    pub time: f64,
    pub last_dt: f64,
}

/// Advance `field` in place by at most `controls.n_timesteps` steps.
///
/// The timestep of every step is fixed by the spectral radius of its first stage residual.
/// Updates happen in conserved variables, the field keeps its own basis in between.
#[allow(clippy::too_many_arguments)]
pub fn integrate<L: ConservationLaw, B: SetBasis>(
    policy: ExecutionPolicy,
    controls: &TimeControls,
    rk: &RungeKutta,
    muscl: &MusclFlux<L>,
    registry: &BoundaryRegistry<L>,
    species: &L::Species,
    mesh: &Mesh,
    field: &mut SolutionField<L, B>,
) -> Result<IntegrationReport, EngineError> {
    field.check_mesh(mesh)?;
    if controls.cfl > rk.max_cfl() {
        warn!(
            "CFL number {} exceeds the stability limit {} of {}",
            controls.cfl,
            rk.max_cfl(),
            rk.name()
        );
    }
    let metric = LeastSquaresMetric::new(policy, mesh, field.bc_types())?;
    let cells = mesh.cells();
    let mut base: Array2<VariableSet<L, Conserved>> =
        Array2::from_elem(cells.dim(), VariableSet::default());
    let mut residuals = Vec::with_capacity(rk.n_stages());
    let mut report = IntegrationReport {
        steps: 0,
        time: 0.,
        last_dt: 0.,
    };

    for step in 0..controls.n_timesteps {
        if matches!(controls.t_end, Some(t_end) if report.time >= t_end) {
            break;
        }
        trace!("Step {step}: {:?}", TimestepPhase::Init);
        let interior = field.interior();
        policy.for_each_indexed(&mut base, |ij, q| *q = interior[ij].convert(species));
        residuals.clear();

        let mut dt = 0.;
        let mut last_step = false;
        for (stage, (beta, alpha)) in rk.beta().iter().zip(rk.alpha().iter()).enumerate() {
            trace!("Step {step}: {:?}", TimestepPhase::Stage(stage));
            let stage_residual = residual(policy, &metric, muscl, registry, species, mesh, field)?;
            if stage == 0 {
                let spectral_radius =
                    policy.max_by(&stage_residual, |ij, r| r.lambda / cells[ij].volume);
                dt = controls.cfl / spectral_radius;
                if let Some(t_end) = controls.t_end {
                    if report.time + dt >= t_end {
                        dt = t_end - report.time;
                        last_step = true;
                    }
                }
            }
            residuals.push(stage_residual);

            let stage_dt = beta * dt;
            let base = &base;
            let residuals = &residuals;
            policy.for_each_indexed(field.interior_mut(), |ij, q| {
                let mut increment = VariableDelta::<L, Conserved>::zeros();
                for (r, a) in residuals.iter().zip(alpha.iter()) {
                    increment += *a * r[ij].flux;
                }
                let u = base[ij] + (stage_dt / cells[ij].volume) * increment;
                *q = u.convert(species);
            });
        }
        trace!("Step {step}: {:?}", TimestepPhase::Committed);

        report.steps += 1;
        report.last_dt = dt;
        report.time = match (last_step, controls.t_end) {
            (true, Some(t_end)) => t_end,
            _ => report.time + dt,
        };
        debug!(
            "Step {}, t = {:.6e}, dt = {:.6e}",
            report.steps, report.time, dt
        );
    }

    if !field.is_finite() {
        warn!("Non finite values in the solution after {} steps", report.steps);
    }
    info!(
        "Integrated {} steps with {} to t = {:.6e}",
        report.steps,
        rk.name(),
        report.time
    );
    Ok(report)
}
