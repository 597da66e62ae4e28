//! Boundary condition dispatch.
//!
//! Every domain edge carries a [`BoundaryType`] tag. At runtime the tag is resolved in a
//! [`BoundaryRegistry`], which maps it to the handler implementing the condition, so the
//! residual assembly never branches on the kind of condition itself.

use std::{collections::HashMap, fmt::Debug};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use yaml_rust::Yaml;

use crate::{
    conservation_law::ConservationLaw,
    errors::{ConfigError, EngineError},
    flux::FluxResult,
    geometry::{Surface, Volume},
    utils::Dimensionality,
};

mod euler;
mod scalar_advection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BoundaryType {
    Periodic,
    /// Constant freestream value, never updated.
    Fixed,
    /// Zero gradient ghost value.
    Extrapolate,
    /// Characteristic far field based on the Riemann invariants.
    Riemann,
    /// Subsonic inlet or outlet imposing entropy and velocity, or pressure.
    Entropy,
    InviscidWall,
}

impl BoundaryType {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_lowercase().as_str() {
            "periodic" => Ok(BoundaryType::Periodic),
            "fixed" => Ok(BoundaryType::Fixed),
            "extrapolate" => Ok(BoundaryType::Extrapolate),
            "riemann" => Ok(BoundaryType::Riemann),
            "entropy" => Ok(BoundaryType::Entropy),
            "inviscid_wall" | "wall" => Ok(BoundaryType::InviscidWall),
            _ => Err(ConfigError::UnknownBoundaryCondition(name.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoundaryType::Periodic => "periodic",
            BoundaryType::Fixed => "fixed",
            BoundaryType::Extrapolate => "extrapolate",
            BoundaryType::Riemann => "riemann",
            BoundaryType::Entropy => "entropy",
            BoundaryType::InviscidWall => "inviscid_wall",
        }
    }

    /// Read one tag per domain edge, ordered left, right, bottom, top.
    pub fn init(cfg: &Yaml, dimensionality: Dimensionality) -> Result<Vec<Self>, ConfigError> {
        let tags = cfg
            .as_vec()
            .ok_or(ConfigError::MissingParameter("boundaries".to_string()))?;
        if tags.len() != dimensionality.n_boundaries() {
            return Err(ConfigError::InvalidArrayLength(
                dimensionality.n_boundaries(),
                tags.len(),
            ));
        }
        tags.iter()
            .map(|tag| {
                let name = tag
                    .as_str()
                    .ok_or(ConfigError::MissingParameter("boundaries".to_string()))?;
                Self::from_name(name)
            })
            .collect()
    }

    /// Which axes are periodic, assuming consistent pairing.
    pub fn periodic_axes(bc_types: &[BoundaryType]) -> [bool; 2] {
        let mut periodic = [false; 2];
        for (axis, pair) in bc_types.chunks(2).enumerate().take(2) {
            periodic[axis] = pair[0] == BoundaryType::Periodic;
        }
        periodic
    }
}

/// How the residual assembly closes the stencil at a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryTreatment {
    /// Paired with the opposite edge like an interior face.
    Periodic,
    /// One-sided flux against a ghost value stored in the solution field.
    GhostCell,
    /// The boundary flux is computed directly from the interior state.
    Flux,
}

/// Compute the ghost state from the outward face, the adjacent cell, the interior state and
/// the reference state of the edge.
pub type GhostUpdate<L> = fn(
    &<L as ConservationLaw>::Species,
    &Surface,
    &Volume,
    &<L as ConservationLaw>::State,
    &<L as ConservationLaw>::State,
) -> <L as ConservationLaw>::State;

/// Compute the flux out of the domain, same arguments as [`GhostUpdate`].
pub type BoundaryFlux<L> = fn(
    &<L as ConservationLaw>::Species,
    &Surface,
    &Volume,
    &<L as ConservationLaw>::State,
    &<L as ConservationLaw>::State,
) -> FluxResult<L>;

pub struct BoundaryCondition<L: ConservationLaw> {
    pub kind: BoundaryType,
    pub treatment: BoundaryTreatment,
    pub update: Option<GhostUpdate<L>>,
    pub flux: Option<BoundaryFlux<L>>,
}

impl<L: ConservationLaw> Clone for BoundaryCondition<L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: ConservationLaw> Copy for BoundaryCondition<L> {}

impl<L: ConservationLaw> Debug for BoundaryCondition<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryCondition")
            .field("kind", &self.kind)
            .field("treatment", &self.treatment)
            .field("update", &self.update.is_some())
            .field("flux", &self.flux.is_some())
            .finish()
    }
}

impl<L: ConservationLaw> BoundaryCondition<L> {
    pub fn periodic() -> Self {
        Self {
            kind: BoundaryType::Periodic,
            treatment: BoundaryTreatment::Periodic,
            update: None,
            flux: None,
        }
    }

    /// Ghost cell condition holding its initial value.
    pub fn fixed() -> Self {
        Self {
            kind: BoundaryType::Fixed,
            treatment: BoundaryTreatment::GhostCell,
            update: None,
            flux: None,
        }
    }

    pub fn ghost_cell(kind: BoundaryType, update: GhostUpdate<L>) -> Self {
        Self {
            kind,
            treatment: BoundaryTreatment::GhostCell,
            update: Some(update),
            flux: None,
        }
    }

    pub fn flux(kind: BoundaryType, flux: BoundaryFlux<L>) -> Self {
        Self {
            kind,
            treatment: BoundaryTreatment::Flux,
            update: None,
            flux: Some(flux),
        }
    }
}

/// Zero gradient ghost value, shared by every law.
fn extrapolate<L: ConservationLaw>(
    _species: &L::Species,
    _face: &Surface,
    _cell: &Volume,
    interior: &L::State,
    _reference: &L::State,
) -> L::State {
    *interior
}

/// Runtime map from boundary tag to its implementation.
#[derive(Debug, Clone)]
pub struct BoundaryRegistry<L: ConservationLaw> {
    handlers: HashMap<BoundaryType, BoundaryCondition<L>>,
}

impl<L: ConservationLaw> Default for BoundaryRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ConservationLaw> BoundaryRegistry<L> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `condition`, replacing any previous handler for the same tag.
    pub fn register(&mut self, condition: BoundaryCondition<L>) -> &mut Self {
        self.handlers.insert(condition.kind, condition);
        self
    }

    pub fn resolve(&self, kind: BoundaryType) -> Result<&BoundaryCondition<L>, EngineError> {
        self.handlers
            .get(&kind)
            .ok_or(EngineError::UnmatchedBoundaryCondition(kind))
    }

    pub fn contains(&self, kind: BoundaryType) -> bool {
        self.handlers.contains_key(&kind)
    }
}

impl<L: StandardBoundaryConditions> BoundaryRegistry<L> {
    /// Registry holding every condition implemented for law `L`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry
            .register(BoundaryCondition::periodic())
            .register(BoundaryCondition::fixed())
            .register(BoundaryCondition::ghost_cell(
                BoundaryType::Extrapolate,
                extrapolate::<L>,
            ));
        L::register_boundary_conditions(&mut registry);
        registry
    }
}

/// Laws providing law specific boundary conditions on top of the common ones.
pub trait StandardBoundaryConditions: ConservationLaw {
    fn register_boundary_conditions(registry: &mut BoundaryRegistry<Self>);
}

#[cfg(test)]
mod test {
    use yaml_rust::YamlLoader;

    use super::*;
    use crate::conservation_law::{Euler, ScalarAdvection};

    #[test]
    fn test_init() {
        let cfg = &YamlLoader::load_from_str("[periodic, periodic, riemann, inviscid_wall]")
            .unwrap()[0];
        let tags = BoundaryType::init(cfg, Dimensionality::TwoD).unwrap();
        assert_eq!(
            tags,
            vec![
                BoundaryType::Periodic,
                BoundaryType::Periodic,
                BoundaryType::Riemann,
                BoundaryType::InviscidWall
            ]
        );
        assert_eq!(BoundaryType::periodic_axes(&tags), [true, false]);
        assert!(BoundaryType::init(cfg, Dimensionality::OneD).is_err());
        assert!(BoundaryType::from_name("outflow").is_err());
    }

    #[test]
    fn test_registry() {
        let euler = BoundaryRegistry::<Euler>::standard();
        for kind in [
            BoundaryType::Periodic,
            BoundaryType::Fixed,
            BoundaryType::Extrapolate,
            BoundaryType::Riemann,
            BoundaryType::Entropy,
        ] {
            assert!(euler.contains(kind));
        }
        assert_eq!(
            euler.resolve(BoundaryType::InviscidWall).unwrap().treatment,
            BoundaryTreatment::Flux
        );

        let scalar = BoundaryRegistry::<ScalarAdvection>::standard();
        assert!(scalar.contains(BoundaryType::Riemann));
        assert_eq!(
            scalar.resolve(BoundaryType::InviscidWall).unwrap_err(),
            EngineError::UnmatchedBoundaryCondition(BoundaryType::InviscidWall)
        );

        let empty = BoundaryRegistry::<Euler>::new();
        assert!(empty.resolve(BoundaryType::Periodic).is_err());
    }

    #[test]
    fn test_repr() {
        let tag: u8 = BoundaryType::Riemann.into();
        assert_eq!(BoundaryType::try_from(tag).unwrap(), BoundaryType::Riemann);
    }
}
