use std::ops::{AddAssign, Neg, SubAssign};

use crate::{
    conservation_law::{Conserved, ConservationLaw},
    physical_quantities::VariableDelta,
};

/// Flux through a face (already scaled by its area) and the spectral radius of the face.
///
/// Accumulating into a residual with `+=` or `-=` always *adds* the spectral radius, so
/// that the residual of a cell carries the sum of the spectral radii of its faces.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FluxResult<L: ConservationLaw> {
    pub flux: VariableDelta<L, Conserved>,
    pub lambda: f64,
}

impl<L: ConservationLaw> FluxResult<L> {
    pub fn new(flux: VariableDelta<L, Conserved>, lambda: f64) -> Self {
        Self { flux, lambda }
    }

    pub fn zero() -> Self {
        Self::new(VariableDelta::zeros(), 0.)
    }

    pub fn is_finite(&self) -> bool {
        self.flux.is_finite() && self.lambda.is_finite()
    }
}

impl<L: ConservationLaw> AddAssign for FluxResult<L> {
    fn add_assign(&mut self, rhs: Self) {
        self.flux += rhs.flux;
        self.lambda += rhs.lambda;
    }
}

impl<L: ConservationLaw> SubAssign for FluxResult<L> {
    fn sub_assign(&mut self, rhs: Self) {
        self.flux -= rhs.flux;
        self.lambda += rhs.lambda;
    }
}

impl<L: ConservationLaw> Neg for FluxResult<L> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.flux, self.lambda)
    }
}
