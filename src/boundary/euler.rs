use super::{BoundaryCondition, BoundaryRegistry, BoundaryType, StandardBoundaryConditions};
use crate::{
    conservation_law::{Euler, EulerState},
    flux::FluxResult,
    gas_law::EulerSpecies,
    geometry::{Surface, Volume},
    physical_quantities::VariableDelta,
};

impl StandardBoundaryConditions for Euler {
    fn register_boundary_conditions(registry: &mut BoundaryRegistry<Self>) {
        registry
            .register(BoundaryCondition::ghost_cell(BoundaryType::Riemann, riemann))
            .register(BoundaryCondition::ghost_cell(BoundaryType::Entropy, entropy))
            .register(BoundaryCondition::flux(BoundaryType::InviscidWall, inviscid_wall));
    }
}

/// Characteristic far field boundary.
///
/// The outgoing invariant `R+ = un + 2a / (gamma - 1)` is taken from the interior, the
/// incoming `R- = un - 2a / (gamma - 1)` from the reference state. Entropy and tangential
/// velocity come from the upwind side.
fn riemann(
    species: &EulerSpecies,
    face: &Surface,
    _cell: &Volume,
    interior: &EulerState,
    reference: &EulerState,
) -> EulerState {
    let normal = face.normal;
    let un_i = interior.velocity().dot(normal);
    let un_r = reference.velocity().dot(normal);
    let a_i = interior.speed_of_sound();
    let a_r = reference.speed_of_sound();

    // Supersonic outflow and inflow
    if un_i >= a_i {
        return *interior;
    }
    if un_r <= -a_r {
        return *reference;
    }

    let gamma = species.gamma();
    let r_plus = un_i + gamma.tdgm1() * a_i;
    let r_minus = un_r - gamma.tdgm1() * a_r;
    let un = 0.5 * (r_plus + r_minus);
    let a = 0.25 * gamma.gm1() * (r_plus - r_minus);

    let upwind = if un > 0. { interior } else { reference };
    let entropy = species.entropy(upwind.pressure(), upwind.density());
    let ut = upwind.velocity().dot(face.tangent());

    // a^2 = gamma s rho^(gamma - 1)
    let density = (a * a * gamma.gamma_inv() / entropy).powf(gamma.odgm1());
    let pressure = density * a * a * gamma.gamma_inv();
    let velocity = un * normal + ut * face.tangent();
    EulerState::new(species, velocity, density, pressure)
}

/// Subsonic inlet or outlet.
///
/// Inflow imposes the reference velocity and entropy, keeping the interior pressure.
/// Outflow imposes the reference pressure, keeping interior velocity and entropy.
fn entropy(
    species: &EulerSpecies,
    face: &Surface,
    _cell: &Volume,
    interior: &EulerState,
    reference: &EulerState,
) -> EulerState {
    if interior.velocity().dot(face.normal) > 0. {
        let entropy = species.entropy(interior.pressure(), interior.density());
        let density = species.density_from_entropy(reference.pressure(), entropy);
        EulerState::new(species, interior.velocity(), density, reference.pressure())
    } else {
        let entropy = species.entropy(reference.pressure(), reference.density());
        let density = species.density_from_entropy(interior.pressure(), entropy);
        EulerState::new(species, reference.velocity(), density, interior.pressure())
    }
}

/// Slip wall: only the pressure contributes to the flux.
fn inviscid_wall(
    _species: &EulerSpecies,
    face: &Surface,
    _cell: &Volume,
    interior: &EulerState,
    _reference: &EulerState,
) -> FluxResult<Euler> {
    let momentum = face.area * interior.pressure() * face.normal;
    let lambda =
        face.area * (interior.velocity().dot(face.normal).abs() + interior.speed_of_sound());
    FluxResult::new(VariableDelta::new([momentum.x, momentum.y, 0., 0.]), lambda)
}
