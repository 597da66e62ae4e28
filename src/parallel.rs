use ndarray::{indices, Array2, Zip};
use rayon::prelude::*;
use yaml_rust::Yaml;

use crate::errors::ConfigError;

/// How the data-parallel loops of the pipeline are executed.
///
/// Every loop body computes a value for, or writes to, exactly one index, so both policies
/// produce identical results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    Serial,
    #[default]
    Parallel,
}

impl ExecutionPolicy {
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        match cfg.as_str() {
            None => Ok(Self::default()),
            Some("serial") => Ok(Self::Serial),
            Some("parallel") => Ok(Self::Parallel),
            Some(name) => Err(ConfigError::UnknownPolicy(name.to_string())),
        }
    }

    /// Evaluate `f` for every index in `0..n` and collect the results in order.
    pub fn map_collect<T, F>(&self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            Self::Serial => (0..n).map(f).collect(),
            Self::Parallel => (0..n).into_par_iter().map(f).collect(),
        }
    }

    /// Evaluate `f` at every index of `shape`.
    pub fn build<T, F>(&self, shape: [usize; 2], f: F) -> Array2<T>
    where
        T: Send,
        F: Fn((usize, usize)) -> T + Sync + Send,
    {
        let zip = Zip::from(indices((shape[0], shape[1])));
        match self {
            Self::Serial => zip.map_collect(f),
            Self::Parallel => zip.par_map_collect(f),
        }
    }

    /// Mutate every element of `array` in place.
    pub fn for_each_indexed<T, F>(&self, array: &mut Array2<T>, f: F)
    where
        T: Send,
        F: Fn((usize, usize), &mut T) + Sync + Send,
    {
        let zip = Zip::indexed(array);
        match self {
            Self::Serial => zip.for_each(f),
            Self::Parallel => zip.par_for_each(f),
        }
    }

    /// Maximum of `f` over `array`, `NEG_INFINITY` when empty.
    pub fn max_by<T, F>(&self, array: &Array2<T>, f: F) -> f64
    where
        T: Sync,
        F: Fn((usize, usize), &T) -> f64 + Sync + Send,
    {
        let values = match self {
            Self::Serial => Zip::indexed(array).map_collect(f),
            Self::Parallel => Zip::indexed(array).par_map_collect(f),
        };
        values.fold(f64::NEG_INFINITY, |max, &v| max.max(v))
    }
}
