use glam::DVec2;
use ndarray::Array2;
use yaml_rust::Yaml;

use crate::errors::{ConfigError, EngineError};

/// The dimensionality of the structured grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, num_enum::IntoPrimitive, num_enum::TryFromPrimitive,
)]
#[repr(usize)]
pub enum Dimensionality {
    OneD = 1,
    TwoD = 2,
}

impl Dimensionality {
    /// Number of domain edges, two per axis.
    pub fn n_boundaries(&self) -> usize {
        2 * usize::from(*self)
    }

    pub fn n_axes(&self) -> usize {
        usize::from(*self)
    }
}

/// Axis and side (0 = lower, 1 = upper) of a boundary id.
pub fn boundary_axis_side(id: usize) -> (usize, usize) {
    (id / 2, id % 2)
}

/// Cell of an array of `shape` adjacent to entry `k` of boundary `id`.
pub fn boundary_cell(shape: [usize; 2], id: usize, k: usize) -> (usize, usize) {
    let [ni, nj] = shape;
    match boundary_axis_side(id) {
        (0, 0) => (0, k),
        (0, _) => (ni - 1, k),
        (_, 0) => (k, 0),
        _ => (k, nj - 1),
    }
}

/// `[rows, columns]` of a 2D array.
pub fn shape_of<T>(array: &Array2<T>) -> [usize; 2] {
    let (ni, nj) = array.dim();
    [ni, nj]
}

pub fn check_shape<T>(
    array: &Array2<T>,
    expected: [usize; 2],
    what: &'static str,
) -> Result<(), EngineError> {
    let found = shape_of(array);
    if found != expected {
        return Err(EngineError::ShapeMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Read a list of `count` numbers, integers are accepted as well.
pub fn parse_f64_list(yaml: &Yaml, name: &str, count: usize) -> Result<Vec<f64>, ConfigError> {
    match yaml.as_vec() {
        Some(arr) if arr.len() == count => arr
            .iter()
            .map(|y| match y {
                Yaml::Real(_) => y.as_f64(),
                Yaml::Integer(i) => Some(*i as f64),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(ConfigError::MissingParameter(name.to_string())),
        Some(arr) => Err(ConfigError::InvalidArrayLength(count, arr.len())),
        None => Err(ConfigError::MissingParameter(name.to_string())),
    }
}

pub fn parse_dvec2(yaml: &Yaml, name: &str) -> Result<DVec2, ConfigError> {
    let values = parse_f64_list(yaml, name, 2)?;
    Ok(DVec2::new(values[0], values[1]))
}
