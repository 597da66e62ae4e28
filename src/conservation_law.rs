//! Conservation laws and the bases their variables can be expressed in.
//!
//! A law is a zero sized marker implementing [`ConservationLaw`]; a basis is a zero sized
//! marker implementing [`Basis`]. Transforms are dispatched at runtime on the [`BasisType`]
//! tag of the basis, every law matching on it for the bases it implements.

use std::fmt::Debug;

use glam::DVec2;

use crate::{errors::ConfigError, flux::FluxResult, geometry::Surface};

mod euler;
mod scalar_advection;

pub use euler::{Euler, EulerState};
pub use scalar_advection::{ScalarAdvection, ScalarSpecies, ScalarState};

/// Storage size of a variable vector. Laws use the first `N_VAR` components.
pub const N_COMPONENTS: usize = 4;

pub type Components = [f64; N_COMPONENTS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LawType {
    Euler,
    ScalarAdvection,
}

impl LawType {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "euler" => Ok(LawType::Euler),
            "scalar_advection" => Ok(LawType::ScalarAdvection),
            _ => Err(ConfigError::UnknownLaw(name.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LawType::Euler => "euler",
            LawType::ScalarAdvection => "scalar_advection",
        }
    }
}

/// Bases in which an absolute state can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasisType {
    Conserved,
    Primitive,
    Viscous,
}

impl BasisType {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "conserved" => Ok(BasisType::Conserved),
            "primitive" => Ok(BasisType::Primitive),
            "viscous" => Ok(BasisType::Viscous),
            _ => Err(ConfigError::UnknownBasis(name.to_string())),
        }
    }
}

pub trait Basis: Debug + Default + Clone + Copy + PartialEq + Send + Sync + 'static {
    const NAME: &'static str;
}

/// A basis that can represent absolute states, not only increments.
pub trait SetBasis: Basis {
    const TYPE: BasisType;
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Conserved;
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Primitive;
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viscous;
/// Wave amplitudes relative to a face normal. Only increments live in this basis.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Characteristic;

impl Basis for Conserved {
    const NAME: &'static str = "conserved";
}
impl Basis for Primitive {
    const NAME: &'static str = "primitive";
}
impl Basis for Viscous {
    const NAME: &'static str = "viscous";
}
impl Basis for Characteristic {
    const NAME: &'static str = "characteristic";
}

impl SetBasis for Conserved {
    const TYPE: BasisType = BasisType::Conserved;
}
impl SetBasis for Primitive {
    const TYPE: BasisType = BasisType::Primitive;
}
impl SetBasis for Viscous {
    const TYPE: BasisType = BasisType::Viscous;
}

pub trait ConservationLaw:
    Debug + Default + Clone + Copy + PartialEq + Send + Sync + 'static
{
    const TYPE: LawType;
    /// Number of variables in 2D.
    const N_VAR: usize;
    /// Genuinely nonlinear characteristic fields, the ones that need an entropy fix.
    const NONLINEAR_FIELDS: &'static [usize];

    type Species: Debug + Send + Sync;
    type State: Debug + Clone + Copy + Send + Sync;

    fn set_to_state(species: &Self::Species, basis: BasisType, q: &Components) -> Self::State;

    fn state_to_set(species: &Self::Species, basis: BasisType, state: &Self::State) -> Components;

    /// Jacobian action dU/dQ at `state`, mapping an increment in `basis` to conserved.
    fn delta_to_conserved(
        species: &Self::Species,
        basis: BasisType,
        state: &Self::State,
        dq: &Components,
    ) -> Components;

    /// Jacobian action dQ/dU at `state`.
    fn delta_from_conserved(
        species: &Self::Species,
        basis: BasisType,
        state: &Self::State,
        du: &Components,
    ) -> Components;

    /// Project a conserved increment onto the characteristic fields along `normal`.
    fn to_characteristic(
        species: &Self::Species,
        normal: DVec2,
        state: &Self::State,
        du: &Components,
    ) -> Components;

    /// Recombine characteristic amplitudes into a conserved increment.
    fn from_characteristic(
        species: &Self::Species,
        normal: DVec2,
        state: &Self::State,
        dw: &Components,
    ) -> Components;

    /// Eigenvalues of the flux jacobian along `normal`, ordered like the characteristic fields.
    fn wave_speeds(species: &Self::Species, normal: DVec2, state: &Self::State) -> Components;

    /// Analytic flux through `face`, scaled by its area.
    fn exact_flux(species: &Self::Species, face: &Surface, state: &Self::State) -> FluxResult<Self>;

    /// Averaged state used to linearize the flux jacobian between two states.
    fn roe_average(species: &Self::Species, left: &Self::State, right: &Self::State)
        -> Self::State;

    fn velocity(state: &Self::State) -> DVec2;

    /// Names of the quantities returned by [`ConservationLaw::quantities`].
    fn quantity_names() -> &'static [&'static str];

    fn quantities(state: &Self::State) -> Vec<f64>;

    fn max_wave_speed(species: &Self::Species, normal: DVec2, state: &Self::State) -> f64 {
        Self::wave_speeds(species, normal, state)
            .iter()
            .take(Self::N_VAR)
            .fold(0., |max: f64, s| max.max(s.abs()))
    }
}
