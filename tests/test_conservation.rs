use common::{
    discretizations, euler_field, get_controls, get_initial_conditions, get_perturbed_mesh,
    get_species, periodic, total_conserved, DENSITY_BUMP_CONFIG, SCALAR_BUMP_CONFIG,
    SHORT_TIME_INTEGRATION_CONFIG,
};
use conslaw_fv::{
    conservation_law::{Conserved, Primitive, ScalarAdvection, ScalarSpecies},
    integrate,
    riemann_solver::FluxKind,
    slope_limiters::Limiter,
    BoundaryRegistry, Dimensionality, ExecutionPolicy, MusclFlux, SolutionField,
};
use float_cmp::assert_approx_eq;

mod common;

#[test]
fn test_euler_totals_are_conserved() {
    let species = get_species();
    let mesh = get_perturbed_mesh([12, 10]);
    let ics = get_initial_conditions(DENSITY_BUMP_CONFIG);
    let (controls, rk) = get_controls(SHORT_TIME_INTEGRATION_CONFIG);

    for (flux, limiter) in discretizations() {
        let mut field =
            euler_field::<Primitive>(&ics, &species, &mesh, periodic(Dimensionality::TwoD));
        let before = total_conserved(&species, &mesh, &field);
        let muscl = MusclFlux::new(limiter, flux.euler_solver());
        let report = integrate(
            ExecutionPolicy::Parallel,
            &controls,
            &rk,
            &muscl,
            &BoundaryRegistry::standard(),
            &species,
            &mesh,
            &mut field,
        )
        .unwrap();
        assert_eq!(report.steps, controls.n_timesteps);
        assert!(report.time > 0.);
        assert!(field.is_finite(), "{} / {}", flux.label(), limiter.label());

        let after = total_conserved(&species, &mesh, &field);
        for (b, a) in before.iter().zip(after.iter()) {
            assert_approx_eq!(f64, *a, *b, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_scalar_totals_are_conserved() {
    let mesh = get_perturbed_mesh([10, 10]);
    let ics = get_initial_conditions(SCALAR_BUMP_CONFIG);
    let (controls, rk) = get_controls(SHORT_TIME_INTEGRATION_CONFIG);

    let solvers = FluxKind::all()
        .into_iter()
        .filter_map(|flux| flux.scalar_advection_solver().ok());
    for solver in solvers {
        let interior = ics.scalar_advection::<Conserved>(&mesh).unwrap();
        let mut field: SolutionField<ScalarAdvection, Conserved> =
            SolutionField::new(mesh.dimensionality(), interior, periodic(Dimensionality::TwoD))
                .unwrap();
        let before = total_conserved(&ScalarSpecies, &mesh, &field);
        integrate(
            ExecutionPolicy::Serial,
            &controls,
            &rk,
            &MusclFlux::new(Limiter::MinMod2, solver),
            &BoundaryRegistry::standard(),
            &ScalarSpecies,
            &mesh,
            &mut field,
        )
        .unwrap();

        let after = total_conserved(&ScalarSpecies, &mesh, &field);
        assert_approx_eq!(f64, after[2], before[2], epsilon = 1e-13);
        assert!(field.is_finite());
    }
}
