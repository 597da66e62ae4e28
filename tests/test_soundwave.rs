use common::{euler_field, get_initial_conditions, get_species, periodic, SOUNDWAVE_CONFIG};
use conslaw_fv::{
    conservation_law::{Euler, Primitive},
    gas_law::EulerSpecies,
    initial_conditions::Soundwave,
    integrate,
    riemann_solver::FluxKind,
    slope_limiters::Limiter,
    BoundaryRegistry, Dimensionality, ExecutionPolicy, InitialConditions, Mesh, MusclFlux,
    RungeKutta, SolutionField, TimeControls,
};
use float_cmp::assert_approx_eq;

mod common;

/// Pressure perturbation scaled to a unit amplitude sine.
fn normalized_pressure(
    wave: &Soundwave,
    species: &EulerSpecies,
    field: &SolutionField<Euler, Primitive>,
) -> Vec<f64> {
    let p0 = wave.background_pressure(species);
    field
        .interior()
        .iter()
        .map(|q| (q.to_state(species).pressure() - p0) / (p0 * wave.mach * wave.amplitude))
        .collect()
}

#[test]
fn test_soundwave_one_period() {
    let species = get_species();
    let ics = get_initial_conditions(SOUNDWAVE_CONFIG);
    let InitialConditions::Soundwave(wave) = ics else {
        panic!("expected a soundwave");
    };
    let mesh = Mesh::uniform_1d(64, 0., 1.).unwrap();
    let mut field = euler_field::<Primitive>(&ics, &species, &mesh, periodic(Dimensionality::OneD));
    let initial = normalized_pressure(&wave, &species, &field);

    let t_end = wave.crossing_time(1.);
    let controls = TimeControls::new(100_000, 1., Some(t_end));
    let report = integrate(
        ExecutionPolicy::Parallel,
        &controls,
        &RungeKutta::ssp34(),
        &MusclFlux::new(Limiter::NoLimit3, FluxKind::Roe.euler_solver()),
        &BoundaryRegistry::standard(),
        &species,
        &mesh,
        &mut field,
    )
    .unwrap();
    assert!(report.steps < controls.n_timesteps);
    assert_approx_eq!(f64, report.time, t_end, ulps = 2);

    let amplitude = initial.iter().fold(0f64, |max, p| max.max(p.abs()));
    assert_approx_eq!(f64, amplitude, 1., epsilon = 1e-2);
    let error = normalized_pressure(&wave, &species, &field)
        .iter()
        .zip(initial.iter())
        .fold(0f64, |max, (p, p_init)| max.max((p - p_init).abs()));
    assert!(error < 5e-2, "soundwave error {error}");
}
