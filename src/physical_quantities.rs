use std::{
    marker::PhantomData,
    ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub, SubAssign},
};

use glam::DVec2;

use crate::conservation_law::{
    Basis, Characteristic, Components, ConservationLaw, SetBasis, N_COMPONENTS,
};

/// A solution value of law `L` expressed in basis `B`.
///
/// Behaves as a point of an affine space: increments can be added to or subtracted from it,
/// and the difference of two sets is a [`VariableDelta`]. Two sets cannot be added.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct VariableSet<L, B>(Components, PhantomData<(L, B)>);

/// An increment (or directional derivative) of a [`VariableSet`] in basis `B`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct VariableDelta<L, B>(Components, PhantomData<(L, B)>);

fn broadcast(n_var: usize, value: f64) -> Components {
    let mut values = [0.; N_COMPONENTS];
    values[..n_var].fill(value);
    values
}

impl<L: ConservationLaw, B: SetBasis> VariableSet<L, B> {
    pub fn new(values: Components) -> Self {
        Self(values, PhantomData)
    }

    /// Every variable set to `value`.
    pub fn splat(value: f64) -> Self {
        Self::new(broadcast(L::N_VAR, value))
    }

    pub fn components(&self) -> &Components {
        &self.0
    }

    pub fn to_state(&self, species: &L::Species) -> L::State {
        L::set_to_state(species, B::TYPE, &self.0)
    }

    pub fn from_state(species: &L::Species, state: &L::State) -> Self {
        Self::new(L::state_to_set(species, B::TYPE, state))
    }

    /// Express the same physical state in basis `B2`.
    pub fn convert<B2: SetBasis>(&self, species: &L::Species) -> VariableSet<L, B2> {
        if B::TYPE == B2::TYPE {
            VariableSet::new(self.0)
        } else {
            VariableSet::from_state(species, &self.to_state(species))
        }
    }

    pub fn is_finite(&self) -> bool {
        self.0[..L::N_VAR].iter().all(|v| v.is_finite())
    }
}

impl<L: ConservationLaw, B: Basis> VariableDelta<L, B> {
    pub fn new(values: Components) -> Self {
        Self(values, PhantomData)
    }

    pub fn zeros() -> Self {
        Self::new([0.; N_COMPONENTS])
    }

    pub fn splat(value: f64) -> Self {
        Self::new(broadcast(L::N_VAR, value))
    }

    pub fn components(&self) -> &Components {
        &self.0
    }

    /// Componentwise combination of two increments.
    pub fn zip_map<F: Fn(f64, f64) -> f64>(&self, other: &Self, f: F) -> Self {
        let mut values = [0.; N_COMPONENTS];
        for k in 0..L::N_VAR {
            values[k] = f(self.0[k], other.0[k]);
        }
        Self::new(values)
    }

    pub fn is_finite(&self) -> bool {
        self.0[..L::N_VAR].iter().all(|v| v.is_finite())
    }
}

impl<L: ConservationLaw, B: SetBasis> VariableDelta<L, B> {
    /// Linearized transform to basis `B2` around `reference`.
    pub fn convert<B2: SetBasis>(
        &self,
        species: &L::Species,
        reference: &L::State,
    ) -> VariableDelta<L, B2> {
        if B::TYPE == B2::TYPE {
            return VariableDelta::new(self.0);
        }
        let du = L::delta_to_conserved(species, B::TYPE, reference, &self.0);
        VariableDelta::new(L::delta_from_conserved(species, B2::TYPE, reference, &du))
    }

    /// Wave amplitudes along `normal`, linearized around `reference`.
    pub fn to_characteristic(
        &self,
        species: &L::Species,
        reference: &L::State,
        normal: DVec2,
    ) -> VariableDelta<L, Characteristic> {
        let du = L::delta_to_conserved(species, B::TYPE, reference, &self.0);
        VariableDelta::new(L::to_characteristic(species, normal, reference, &du))
    }
}

impl<L: ConservationLaw> VariableDelta<L, Characteristic> {
    pub fn to_basis<B2: SetBasis>(
        &self,
        species: &L::Species,
        reference: &L::State,
        normal: DVec2,
    ) -> VariableDelta<L, B2> {
        let du = L::from_characteristic(species, normal, reference, &self.0);
        VariableDelta::new(L::delta_from_conserved(species, B2::TYPE, reference, &du))
    }
}

impl<L: ConservationLaw, B: SetBasis> Sub for VariableSet<L, B> {
    type Output = VariableDelta<L, B>;

    fn sub(self, rhs: Self) -> Self::Output {
        VariableDelta::new(std::array::from_fn(|k| self.0[k] - rhs.0[k]))
    }
}

impl<L: ConservationLaw, B: SetBasis> Add<VariableDelta<L, B>> for VariableSet<L, B> {
    type Output = Self;

    fn add(self, rhs: VariableDelta<L, B>) -> Self::Output {
        Self::new(std::array::from_fn(|k| self.0[k] + rhs.0[k]))
    }
}

impl<L: ConservationLaw, B: SetBasis> AddAssign<VariableDelta<L, B>> for VariableSet<L, B> {
    fn add_assign(&mut self, rhs: VariableDelta<L, B>) {
        for k in 0..N_COMPONENTS {
            self.0[k] += rhs.0[k];
        }
    }
}

impl<L: ConservationLaw, B: SetBasis> Sub<VariableDelta<L, B>> for VariableSet<L, B> {
    type Output = Self;

    fn sub(self, rhs: VariableDelta<L, B>) -> Self::Output {
        Self::new(std::array::from_fn(|k| self.0[k] - rhs.0[k]))
    }
}

impl<L: ConservationLaw, B: SetBasis> SubAssign<VariableDelta<L, B>> for VariableSet<L, B> {
    fn sub_assign(&mut self, rhs: VariableDelta<L, B>) {
        for k in 0..N_COMPONENTS {
            self.0[k] -= rhs.0[k];
        }
    }
}

impl<L: ConservationLaw, B: SetBasis> Index<usize> for VariableSet<L, B> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        if index >= L::N_VAR {
            panic!("Index out of bounds for VariableSet!");
        }
        &self.0[index]
    }
}

impl<L: ConservationLaw, B: SetBasis> IndexMut<usize> for VariableSet<L, B> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index >= L::N_VAR {
            panic!("Index out of bounds for VariableSet!");
        }
        &mut self.0[index]
    }
}

impl<L: ConservationLaw, B: Basis> Add for VariableDelta<L, B> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(std::array::from_fn(|k| self.0[k] + rhs.0[k]))
    }
}

impl<L: ConservationLaw, B: Basis> AddAssign for VariableDelta<L, B> {
    fn add_assign(&mut self, rhs: Self) {
        for k in 0..N_COMPONENTS {
            self.0[k] += rhs.0[k];
        }
    }
}

impl<L: ConservationLaw, B: Basis> Sub for VariableDelta<L, B> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(std::array::from_fn(|k| self.0[k] - rhs.0[k]))
    }
}

impl<L: ConservationLaw, B: Basis> SubAssign for VariableDelta<L, B> {
    fn sub_assign(&mut self, rhs: Self) {
        for k in 0..N_COMPONENTS {
            self.0[k] -= rhs.0[k];
        }
    }
}

impl<L: ConservationLaw, B: Basis> Neg for VariableDelta<L, B> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(self.0.map(|v| -v))
    }
}

impl<L: ConservationLaw, B: Basis> Mul<f64> for VariableDelta<L, B> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.0.map(|v| v * rhs))
    }
}

impl<L: ConservationLaw, B: Basis> Mul<VariableDelta<L, B>> for f64 {
    type Output = VariableDelta<L, B>;

    fn mul(self, rhs: VariableDelta<L, B>) -> Self::Output {
        rhs * self
    }
}

impl<L: ConservationLaw, B: Basis> Div<f64> for VariableDelta<L, B> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.0.map(|v| v / rhs))
    }
}

impl<L: ConservationLaw, B: Basis> Index<usize> for VariableDelta<L, B> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        if index >= L::N_VAR {
            panic!("Index out of bounds for VariableDelta!");
        }
        &self.0[index]
    }
}

impl<L: ConservationLaw, B: Basis> IndexMut<usize> for VariableDelta<L, B> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index >= L::N_VAR {
            panic!("Index out of bounds for VariableDelta!");
        }
        &mut self.0[index]
    }
}

/// Spatial gradient of every variable of a [`VariableSet`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Gradient<L, B>([DVec2; N_COMPONENTS], PhantomData<(L, B)>);

impl<L: ConservationLaw, B: SetBasis> Gradient<L, B> {
    pub fn zeros() -> Self {
        Self([DVec2::ZERO; N_COMPONENTS], PhantomData)
    }

    /// Directional derivative along `dx`.
    pub fn dot(&self, dx: DVec2) -> VariableDelta<L, B> {
        VariableDelta::new(self.0.map(|g| g.dot(dx)))
    }

    pub fn is_finite(&self) -> bool {
        self.0[..L::N_VAR].iter().all(|g| g.is_finite())
    }
}

impl<L: ConservationLaw, B: SetBasis> Index<usize> for Gradient<L, B> {
    type Output = DVec2;

    fn index(&self, index: usize) -> &Self::Output {
        if index >= L::N_VAR {
            panic!("Index out of bounds for Gradient!");
        }
        &self.0[index]
    }
}

impl<L: ConservationLaw, B: SetBasis> IndexMut<usize> for Gradient<L, B> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        if index >= L::N_VAR {
            panic!("Index out of bounds for Gradient!");
        }
        &mut self.0[index]
    }
}
