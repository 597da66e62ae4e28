use ndarray::{Array1, Array2};

use crate::{
    boundary::BoundaryType,
    conservation_law::{ConservationLaw, SetBasis},
    errors::EngineError,
    mesh::Mesh,
    physical_quantities::VariableSet,
    utils::{boundary_cell, check_shape, shape_of, Dimensionality},
};

/// The evolving solution: interior cell values plus one ghost array and one reference array
/// per domain edge, ordered left, right, bottom, top.
///
/// Boundary handlers read the reference array of an edge and write its ghost array.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionField<L: ConservationLaw, B: SetBasis> {
    dimensionality: Dimensionality,
    interior: Array2<VariableSet<L, B>>,
    boundaries: Vec<Array1<VariableSet<L, B>>>,
    references: Vec<Array1<VariableSet<L, B>>>,
    bc_types: Vec<BoundaryType>,
}

impl<L: ConservationLaw, B: SetBasis> SolutionField<L, B> {
    /// Ghost and reference values start out as copies of the adjacent interior values.
    pub fn new(
        dimensionality: Dimensionality,
        interior: Array2<VariableSet<L, B>>,
        bc_types: Vec<BoundaryType>,
    ) -> Result<Self, EngineError> {
        let n_boundaries = dimensionality.n_boundaries();
        if bc_types.len() != n_boundaries {
            return Err(EngineError::ShapeMismatch {
                what: "boundary conditions",
                expected: [n_boundaries, 1],
                found: [bc_types.len(), 1],
            });
        }
        let shape = shape_of(&interior);
        if shape[0] == 0 || shape[1] == 0 {
            return Err(EngineError::ShapeMismatch {
                what: "solution interior",
                expected: [shape[0].max(1), shape[1].max(1)],
                found: shape,
            });
        }
        if dimensionality == Dimensionality::OneD && shape[1] != 1 {
            return Err(EngineError::ShapeMismatch {
                what: "1D solution",
                expected: [shape[0], 1],
                found: shape,
            });
        }
        for axis in 0..dimensionality.n_axes() {
            let lower = bc_types[2 * axis] == BoundaryType::Periodic;
            let upper = bc_types[2 * axis + 1] == BoundaryType::Periodic;
            if lower != upper {
                return Err(EngineError::InconsistentPeriodicPairing { axis });
            }
        }

        let boundaries: Vec<_> = (0..n_boundaries)
            .map(|id| {
                let len = shape[1 - id / 2];
                Array1::from_shape_fn(len, |k| interior[boundary_cell(shape, id, k)])
            })
            .collect();
        Ok(Self {
            dimensionality,
            interior,
            references: boundaries.clone(),
            boundaries,
            bc_types,
        })
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    pub fn shape(&self) -> [usize; 2] {
        shape_of(&self.interior)
    }

    pub fn interior(&self) -> &Array2<VariableSet<L, B>> {
        &self.interior
    }

    pub fn interior_mut(&mut self) -> &mut Array2<VariableSet<L, B>> {
        &mut self.interior
    }

    pub fn bc_types(&self) -> &[BoundaryType] {
        &self.bc_types
    }

    fn check_boundary_id(&self, id: usize) -> Result<(), EngineError> {
        let n_boundaries = self.dimensionality.n_boundaries();
        if id >= n_boundaries {
            return Err(EngineError::InvalidBoundaryId { id, n_boundaries });
        }
        Ok(())
    }

    pub fn bc_type(&self, id: usize) -> Result<BoundaryType, EngineError> {
        self.check_boundary_id(id)?;
        Ok(self.bc_types[id])
    }

    /// Ghost values of edge `id`.
    pub fn boundary(&self, id: usize) -> Result<&Array1<VariableSet<L, B>>, EngineError> {
        self.check_boundary_id(id)?;
        Ok(&self.boundaries[id])
    }

    pub(crate) fn boundary_mut(
        &mut self,
        id: usize,
    ) -> Result<&mut Array1<VariableSet<L, B>>, EngineError> {
        self.check_boundary_id(id)?;
        Ok(&mut self.boundaries[id])
    }

    /// Reference (freestream) values of edge `id`.
    pub fn reference(&self, id: usize) -> Result<&Array1<VariableSet<L, B>>, EngineError> {
        self.check_boundary_id(id)?;
        Ok(&self.references[id])
    }

    /// Ghost values of every edge, indexed by boundary id.
    pub(crate) fn boundaries(&self) -> &[Array1<VariableSet<L, B>>] {
        &self.boundaries
    }

    pub(crate) fn references(&self) -> &[Array1<VariableSet<L, B>>] {
        &self.references
    }

    /// Set both the reference and the ghost values of edge `id` to `value`.
    pub fn set_boundary_value(
        &mut self,
        id: usize,
        value: VariableSet<L, B>,
    ) -> Result<(), EngineError> {
        self.check_boundary_id(id)?;
        self.references[id].fill(value);
        self.boundaries[id].fill(value);
        Ok(())
    }

    /// Deep copy of `other` reusing the existing allocations.
    pub fn copy_from(&mut self, other: &Self) -> Result<(), EngineError> {
        if self.dimensionality != other.dimensionality || self.bc_types != other.bc_types {
            return Err(EngineError::ShapeMismatch {
                what: "solution field layout",
                expected: [self.dimensionality.into(), self.bc_types.len()],
                found: [other.dimensionality.into(), other.bc_types.len()],
            });
        }
        check_shape(&other.interior, self.shape(), "solution interior")?;
        self.interior.assign(&other.interior);
        for (dst, src) in self
            .boundaries
            .iter_mut()
            .chain(self.references.iter_mut())
            .zip(other.boundaries.iter().chain(other.references.iter()))
        {
            dst.assign(src);
        }
        Ok(())
    }

    /// Whether the field fits `mesh`.
    pub fn check_mesh(&self, mesh: &Mesh) -> Result<(), EngineError> {
        if mesh.dimensionality() != self.dimensionality {
            return Err(EngineError::ShapeMismatch {
                what: "mesh dimensionality",
                expected: [self.dimensionality.into(), 1],
                found: [mesh.dimensionality().into(), 1],
            });
        }
        check_shape(&self.interior, mesh.shape(), "solution interior")
    }

    /// Health check for the caller, nothing in the pipeline enforces realizability.
    pub fn is_finite(&self) -> bool {
        self.interior.iter().all(|q| q.is_finite())
            && self
                .boundaries
                .iter()
                .all(|boundary| boundary.iter().all(|q| q.is_finite()))
    }
}
