use std::{
    error::Error,
    fmt::{Debug, Display},
};

use crate::boundary::BoundaryType;

#[derive(Debug)]
pub enum ConfigError {
    MissingParameter(String),
    UnknownLaw(String),
    UnknownBasis(String),
    UnknownFlux(String),
    UnsupportedFlux(String, &'static str),
    UnknownLimiter(String),
    UnknownScheme(String),
    UnknownBoundaryCondition(String),
    UnknownPolicy(String),
    UnknownCase(String),
    UnsupportedCase(String, &'static str),
    InvalidArrayLength(usize, usize),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingParameter(name) => {
                write!(f, "Missing required parameter in configuration: {}", name)
            }
            ConfigError::UnknownLaw(name) => {
                write!(f, "Unknown type of conservation law configured: {}", name)
            }
            ConfigError::UnknownBasis(name) => {
                write!(f, "Unknown type of variable basis configured: {}", name)
            }
            ConfigError::UnknownFlux(name) => {
                write!(f, "Unknown type of numerical flux configured: {name}")
            }
            ConfigError::UnsupportedFlux(name, law) => {
                write!(f, "Numerical flux {name} is not available for law {law}")
            }
            ConfigError::UnknownLimiter(name) => {
                write!(f, "Unknown type of slope limiter configured: {}", name)
            }
            ConfigError::UnknownScheme(name) => {
                write!(f, "Unknown Runge-Kutta scheme configured: {}", name)
            }
            ConfigError::UnknownBoundaryCondition(name) => {
                write!(f, "Unknown type of boundary condition configured: {}", name)
            }
            ConfigError::UnknownPolicy(name) => {
                write!(f, "Unknown execution policy configured: {}", name)
            }
            ConfigError::UnknownCase(name) => {
                write!(f, "Unknown type of initial conditions configured: {}", name)
            }
            ConfigError::UnsupportedCase(name, law) => {
                write!(f, "Initial conditions {name} are not available for law {law}")
            }
            ConfigError::InvalidArrayLength(a, b) => {
                write!(f, "Expected array of length {}, but found {}", a, b)
            }
        }
    }
}

impl Error for ConfigError {}

/// Precondition failures of the finite volume pipeline. All of them are fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    ShapeMismatch {
        what: &'static str,
        expected: [usize; 2],
        found: [usize; 2],
    },
    InvalidBoundaryId {
        id: usize,
        n_boundaries: usize,
    },
    UnmatchedBoundaryCondition(BoundaryType),
    InconsistentPeriodicPairing {
        axis: usize,
    },
    SingularLeastSquaresMetric {
        cell: [usize; 2],
    },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "Shape mismatch for {what}: expected {:?}, but found {:?}",
                expected, found
            ),
            EngineError::InvalidBoundaryId { id, n_boundaries } => write!(
                f,
                "Invalid boundary id {id}, must be smaller than {n_boundaries}"
            ),
            EngineError::UnmatchedBoundaryCondition(bc) => write!(
                f,
                "No handler registered for boundary condition {}",
                bc.label()
            ),
            EngineError::InconsistentPeriodicPairing { axis } => write!(
                f,
                "Only one side of the periodic pair along axis {axis} is tagged periodic"
            ),
            EngineError::SingularLeastSquaresMetric { cell } => write!(
                f,
                "Least squares metric of cell {:?} is singular",
                cell
            ),
        }
    }
}

impl Error for EngineError {}
