use yaml_rust::Yaml;

use crate::errors::ConfigError;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct AdiabaticIndex {
    gamma: f64,
    gamma_inv: f64,
    odgm1: f64,
    odgp1: f64,
}

impl From<f64> for AdiabaticIndex {
    fn from(value: f64) -> Self {
        AdiabaticIndex {
            gamma: value,
            gamma_inv: 1. / value,
            odgm1: 1. / (value - 1.),
            odgp1: 1. / (value + 1.),
        }
    }
}

impl From<AdiabaticIndex> for f64 {
    fn from(value: AdiabaticIndex) -> Self {
        value.gamma
    }
}

impl AdiabaticIndex {
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn gamma_inv(&self) -> f64 {
        self.gamma_inv
    }

    pub fn gm1(&self) -> f64 {
        self.gamma - 1.
    }

    pub fn gp1dg(&self) -> f64 {
        (self.gamma + 1.) * self.gamma_inv
    }

    pub fn odgm1(&self) -> f64 {
        self.odgm1
    }

    pub fn tdgm1(&self) -> f64 {
        2. * self.odgm1
    }

    pub fn gm1dgp1(&self) -> f64 {
        (self.gamma - 1.) * self.odgp1
    }
}

/// Physical constants of a calorically perfect gas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerSpecies {
    gamma: AdiabaticIndex,
    /// Specific gas constant.
    pub gas_constant: f64,
    pub prandtl: f64,
    /// Reference Mach number, used by the low Mach scaling of AUSM+up.
    pub minf: f64,
    /// Kinematic viscosity.
    pub nu: f64,
}

impl Default for EulerSpecies {
    fn default() -> Self {
        Self::air()
    }
}

impl EulerSpecies {
    pub fn new(gamma: f64, gas_constant: f64, prandtl: f64, minf: f64, nu: f64) -> Self {
        Self {
            gamma: gamma.into(),
            gas_constant,
            prandtl,
            minf,
            nu,
        }
    }

    pub fn air() -> Self {
        Self::new(1.4, 287.058, 0.7, 1.0, 1.81e-5)
    }

    /// Missing constants fall back on the values for air, `gamma` is required.
    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let air = Self::air();
        let gamma = cfg["gamma"]
            .as_f64()
            .ok_or(ConfigError::MissingParameter("species:gamma".to_string()))?;
        Ok(Self::new(
            gamma,
            cfg["gas_constant"].as_f64().unwrap_or(air.gas_constant),
            cfg["prandtl"].as_f64().unwrap_or(air.prandtl),
            cfg["minf"].as_f64().unwrap_or(air.minf),
            cfg["nu"].as_f64().unwrap_or(air.nu),
        ))
    }

    pub fn gamma(&self) -> &AdiabaticIndex {
        &self.gamma
    }

    pub fn sound_speed2(&self, pressure: f64, density: f64) -> f64 {
        self.gamma.gamma * pressure / density
    }

    /// Entropy function p / rho^gamma.
    pub fn entropy(&self, pressure: f64, density: f64) -> f64 {
        pressure / density.powf(self.gamma.gamma)
    }

    /// Density for which `entropy(pressure, density) == entropy`.
    pub fn density_from_entropy(&self, pressure: f64, entropy: f64) -> f64 {
        (pressure / entropy).powf(self.gamma.gamma_inv)
    }
}
