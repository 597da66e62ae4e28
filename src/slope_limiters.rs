use yaml_rust::Yaml;

use crate::{
    conservation_law::{ConservationLaw, SetBasis},
    errors::ConfigError,
    physical_quantities::VariableDelta,
};

/// Slope limiters acting on a pair of differences: the central difference `a` across the
/// face and the upwind biased difference `b` estimated from the cell gradient.
///
/// The trailing digit is the nominal order of the reconstruction on smooth data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limiter {
    /// First order, no reconstruction.
    NoLimit1,
    /// Unlimited gradient extrapolation.
    NoLimit2,
    /// Unlimited parabolic blend `(2a + b) / 3`.
    NoLimit3,
    VanAlbada2,
    MinMod2,
    VanLeer2,
    Superbee2,
    MonotonizedCentral2,
    /// Third order limiter of Čada & Torrilhon (2009).
    Cada3,
}

/// `a` and `b` divided by the larger magnitude, together with that magnitude.
///
/// One of the scaled values is `±1`, so products and sums of them neither overflow nor
/// underflow to a zero denominator.
fn scaled(a: f64, b: f64) -> (f64, f64, f64) {
    let scale = a.abs().max(b.abs());
    (a / scale, b / scale, scale)
}

fn van_albada(a: f64, b: f64) -> f64 {
    let (x, y, scale) = scaled(a, b);
    scale * x * y * (x + y) / (x * x + y * y)
}

fn min_mod(a: f64, b: f64) -> f64 {
    a.signum() * a.abs().min(b.abs())
}

fn van_leer(a: f64, b: f64) -> f64 {
    let (x, y, scale) = scaled(a, b);
    scale * 2. * x * y / (x + y)
}

fn superbee(a: f64, b: f64) -> f64 {
    a.signum() * (2. * a.abs()).min(b.abs()).max(a.abs().min(2. * b.abs()))
}

fn monotonized_central(a: f64, b: f64) -> f64 {
    a.signum() * (2. * a.abs()).min(2. * b.abs()).min((0.5 * a + 0.5 * b).abs())
}

/// Both nonzero with equal signs. Compares signs instead of the sign of `a * b`, which
/// underflows to zero for tiny arguments.
fn same_sign(a: f64, b: f64) -> bool {
    a != 0. && b != 0. && a.is_sign_negative() == b.is_sign_negative()
}

fn cada(a: f64, b: f64) -> f64 {
    if a == 0. {
        return 0.;
    }
    let theta = b / a;
    a * ((2. + theta) / 3.).min(2. * theta).min(1.6).max(0.)
}

impl Limiter {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "nolimit1" => Ok(Limiter::NoLimit1),
            "nolimit2" => Ok(Limiter::NoLimit2),
            "nolimit3" => Ok(Limiter::NoLimit3),
            "vanalbada2" => Ok(Limiter::VanAlbada2),
            "minmod2" => Ok(Limiter::MinMod2),
            "vanleer2" => Ok(Limiter::VanLeer2),
            "superbee2" => Ok(Limiter::Superbee2),
            "monotonizedcentral2" | "mc2" => Ok(Limiter::MonotonizedCentral2),
            "cada3" => Ok(Limiter::Cada3),
            _ => Err(ConfigError::UnknownLimiter(name.to_string())),
        }
    }

    pub fn init(cfg: &Yaml) -> Result<Self, ConfigError> {
        let name = cfg["limiter"]
            .as_str()
            .ok_or(ConfigError::MissingParameter("discretization:limiter".to_string()))?;
        Self::from_name(name)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Limiter::NoLimit1 => "NoLimit1",
            Limiter::NoLimit2 => "NoLimit2",
            Limiter::NoLimit3 => "NoLimit3",
            Limiter::VanAlbada2 => "VanAlbada2",
            Limiter::MinMod2 => "MinMod2",
            Limiter::VanLeer2 => "VanLeer2",
            Limiter::Superbee2 => "Superbee2",
            Limiter::MonotonizedCentral2 => "MonotonizedCentral2",
            Limiter::Cada3 => "Cada3",
        }
    }

    pub fn all() -> [Limiter; 9] {
        [
            Limiter::NoLimit1,
            Limiter::NoLimit2,
            Limiter::NoLimit3,
            Limiter::VanAlbada2,
            Limiter::MinMod2,
            Limiter::VanLeer2,
            Limiter::Superbee2,
            Limiter::MonotonizedCentral2,
            Limiter::Cada3,
        ]
    }

    /// Whether the limiter never extrapolates through a local extremum.
    pub fn is_monotone(&self) -> bool {
        !matches!(
            self,
            Limiter::NoLimit1 | Limiter::NoLimit2 | Limiter::NoLimit3
        )
    }

    /// Limited difference from the central difference `a` and the biased difference `b`.
    pub fn limit(&self, a: f64, b: f64) -> f64 {
        match self {
            Limiter::NoLimit1 => 0.,
            Limiter::NoLimit2 => b,
            Limiter::NoLimit3 => (2. * a + b) / 3.,
            _ if !same_sign(a, b) => 0.,
            Limiter::VanAlbada2 => van_albada(a, b),
            Limiter::MinMod2 => min_mod(a, b),
            Limiter::VanLeer2 => van_leer(a, b),
            Limiter::Superbee2 => superbee(a, b),
            Limiter::MonotonizedCentral2 => monotonized_central(a, b),
            Limiter::Cada3 => cada(a, b),
        }
    }

    /// Componentwise limiting of a variable increment.
    pub fn limit_delta<L: ConservationLaw, B: SetBasis>(
        &self,
        central: &VariableDelta<L, B>,
        biased: &VariableDelta<L, B>,
    ) -> VariableDelta<L, B> {
        central.zip_map(biased, |a, b| self.limit(a, b))
    }
}
