use common::{
    euler_field, get_controls, get_initial_conditions, get_species, SOD_CONFIG,
    SOD_TIME_INTEGRATION_CONFIG,
};
use conslaw_fv::{
    conservation_law::{Conserved, Primitive, SetBasis},
    gas_law::EulerSpecies,
    integrate,
    riemann_solver::FluxKind,
    slope_limiters::Limiter,
    BoundaryRegistry, BoundaryType, ExecutionPolicy, Mesh, MusclFlux,
};
use float_cmp::assert_approx_eq;

mod common;

const N_CELLS: usize = 128;
/// Cells next to the right edge reached by the reflection of the outgoing contact.
const REFLECTION_CELLS: usize = 16;
/// Density and pressure between the rarefaction and the contact of the Sod problem.
const RHO_STAR: f64 = 0.42632;
const P_STAR: f64 = 0.30313;

/// Density and pressure profiles of the Sod problem after the configured number of steps.
fn run_sod<B: SetBasis>(species: &EulerSpecies, limiter: Limiter) -> (Vec<f64>, Vec<f64>) {
    let mesh = Mesh::uniform_1d(N_CELLS, 0., 1.).unwrap();
    let ics = get_initial_conditions(SOD_CONFIG);
    let (controls, rk) = get_controls(SOD_TIME_INTEGRATION_CONFIG);
    let mut field = euler_field::<B>(&ics, species, &mesh, vec![BoundaryType::Fixed; 2]);

    let report = integrate(
        ExecutionPolicy::Parallel,
        &controls,
        &rk,
        &MusclFlux::new(limiter, FluxKind::Roe.euler_solver()),
        &BoundaryRegistry::standard(),
        species,
        &mesh,
        &mut field,
    )
    .unwrap();
    assert_eq!(report.steps, 480);
    assert!(field.is_finite());

    field
        .interior()
        .iter()
        .map(|q| {
            let state = q.to_state(species);
            (state.density(), state.pressure())
        })
        .unzip()
}

fn check_profile(density: &[f64], pressure: &[f64]) {
    // The shock and the contact have left the domain, the rarefaction expands into the
    // post-shock plateau.
    assert_approx_eq!(f64, density[N_CELLS / 2], RHO_STAR, epsilon = 1e-2);
    assert_approx_eq!(f64, pressure[N_CELLS / 2], P_STAR, epsilon = 1e-2);
    for (rho, p) in density.iter().zip(pressure.iter()) {
        assert!(*rho > RHO_STAR - 2e-3 && *rho <= 1., "density {rho}");
        assert!(*p > P_STAR - 2e-3 && *p <= 1., "pressure {p}");
    }
    // Non increasing, up to the wave reflected by the fixed state at the right edge.
    for pair in density[..N_CELLS - REFLECTION_CELLS].windows(2) {
        assert!(pair[1] < pair[0] + 1e-3, "{} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn test_sod_minmod() {
    let species = get_species();
    let (density, pressure) = run_sod::<Conserved>(&species, Limiter::MinMod2);
    check_profile(&density, &pressure);
}

#[test]
fn test_sod_van_albada() {
    let species = get_species();
    let (density, pressure) = run_sod::<Primitive>(&species, Limiter::VanAlbada2);
    check_profile(&density, &pressure);
}
