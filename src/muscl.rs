use glam::DVec2;

use crate::{
    conservation_law::{ConservationLaw, SetBasis},
    flux::FluxResult,
    geometry::Surface,
    physical_quantities::{Gradient, VariableSet},
    riemann_solver::RiemannFluxSolver,
    slope_limiters::Limiter,
};

/// High order face flux: limited MUSCL reconstruction followed by a numerical flux.
///
/// Reconstruction happens in the basis the solution is stored in.
pub struct MusclFlux<L: ConservationLaw> {
    limiter: Limiter,
    riemann_solver: Box<dyn RiemannFluxSolver<L>>,
}

impl<L: ConservationLaw> MusclFlux<L> {
    pub fn new(limiter: Limiter, riemann_solver: Box<dyn RiemannFluxSolver<L>>) -> Self {
        Self {
            limiter,
            riemann_solver,
        }
    }

    pub fn limiter(&self) -> Limiter {
        self.limiter
    }

    pub fn riemann_solver(&self) -> &dyn RiemannFluxSolver<L> {
        self.riemann_solver.as_ref()
    }

    /// Face values on both sides of a face, `dx` is the displacement from the left to the
    /// right cell centroid.
    pub fn reconstruct<B: SetBasis>(
        &self,
        q_l: &VariableSet<L, B>,
        gradient_l: &Gradient<L, B>,
        q_r: &VariableSet<L, B>,
        gradient_r: &Gradient<L, B>,
        dx: DVec2,
    ) -> (VariableSet<L, B>, VariableSet<L, B>) {
        let central = *q_r - *q_l;
        let biased_l = 2. * gradient_l.dot(dx) - central;
        let biased_r = 2. * gradient_r.dot(dx) - central;
        (
            *q_l + 0.5 * self.limiter.limit_delta(&central, &biased_l),
            *q_r - 0.5 * self.limiter.limit_delta(&central, &biased_r),
        )
    }

    /// Flux from the left to the right cell through `face`.
    #[allow(clippy::too_many_arguments)]
    pub fn face_flux<B: SetBasis>(
        &self,
        species: &L::Species,
        face: &Surface,
        q_l: &VariableSet<L, B>,
        gradient_l: &Gradient<L, B>,
        q_r: &VariableSet<L, B>,
        gradient_r: &Gradient<L, B>,
        dx: DVec2,
    ) -> FluxResult<L> {
        let (face_l, face_r) = self.reconstruct(q_l, gradient_l, q_r, gradient_r, dx);
        self.riemann_solver.flux_states(
            species,
            face,
            &face_l.to_state(species),
            &face_r.to_state(species),
        )
    }

    /// Flux out of the domain through the outward boundary `face` against a ghost value.
    ///
    /// The interior side is reconstructed with the ghost as neighbour at the mirrored
    /// displacement `dx`, the ghost side is used as is.
    pub fn ghost_flux<B: SetBasis>(
        &self,
        species: &L::Species,
        face: &Surface,
        q: &VariableSet<L, B>,
        gradient: &Gradient<L, B>,
        ghost: &VariableSet<L, B>,
        dx: DVec2,
    ) -> FluxResult<L> {
        let central = *ghost - *q;
        let biased = 2. * gradient.dot(dx) - central;
        let face_q = *q + 0.5 * self.limiter.limit_delta(&central, &biased);
        self.riemann_solver.flux_states(
            species,
            face,
            &face_q.to_state(species),
            &ghost.to_state(species),
        )
    }
}
