//! Finite volume engine for explicit integration of hyperbolic conservation laws on structured
//! 1D and 2D grids.
//!
//! The Euler equations and scalar advection share one pipeline: least squares gradients,
//! limited MUSCL reconstruction, a numerical flux, residual assembly with boundary condition
//! dispatch, and strong stability preserving Runge-Kutta time stepping.
//!
//! The library also provides a family of numerical fluxes (Roe, HLLC, AUSM+up, SLAU, ...)
//! usable on their own.

pub use boundary::{BoundaryCondition, BoundaryRegistry, BoundaryTreatment, BoundaryType};
pub use errors::{ConfigError, EngineError};
pub use initial_conditions::InitialConditions;
pub use mesh::Mesh;
pub use muscl::MusclFlux;
pub use parallel::ExecutionPolicy;
pub use residual::{assemble_residual, update_boundaries};
pub use solution_field::SolutionField;
pub use time_integration::{integrate, IntegrationReport, RungeKutta, TimeControls};
pub use utils::Dimensionality;

pub mod boundary;
pub mod conservation_law;
mod errors;
pub mod flux;
pub mod gas_law;
pub mod geometry;
pub mod gradients;
pub mod initial_conditions;
#[cfg(feature = "hdf5")]
mod macros;
pub mod mesh;
pub mod muscl;
pub mod parallel;
pub mod physical_quantities;
pub mod residual;
pub mod riemann_solver;
pub mod slope_limiters;
#[cfg(feature = "hdf5")]
pub mod snapshot;
pub mod solution_field;
pub mod time_integration;
pub mod utils;
