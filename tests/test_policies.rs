use common::{
    euler_field, get_controls, get_initial_conditions, get_perturbed_mesh, get_species,
    DENSITY_BUMP_CONFIG, SHORT_TIME_INTEGRATION_CONFIG,
};
use conslaw_fv::{
    assemble_residual,
    conservation_law::Conserved,
    integrate,
    riemann_solver::FluxKind,
    slope_limiters::Limiter,
    BoundaryRegistry, BoundaryType, ExecutionPolicy, MusclFlux,
};

mod common;

/// Periodic in x, characteristic far field at the bottom and a wall at the top.
fn bc_types() -> Vec<BoundaryType> {
    vec![
        BoundaryType::Periodic,
        BoundaryType::Periodic,
        BoundaryType::Riemann,
        BoundaryType::InviscidWall,
    ]
}

#[test]
fn test_policies_agree_bitwise() {
    let species = get_species();
    let mesh = get_perturbed_mesh([16, 9]);
    let ics = get_initial_conditions(DENSITY_BUMP_CONFIG);
    let registry = BoundaryRegistry::standard();
    let (controls, rk) = get_controls(SHORT_TIME_INTEGRATION_CONFIG);

    for flux in [FluxKind::Roe, FluxKind::Hllc, FluxKind::AusmPlusUp] {
        let muscl = MusclFlux::new(Limiter::VanLeer2, flux.euler_solver());
        let mut serial = euler_field::<Conserved>(&ics, &species, &mesh, bc_types());
        let mut parallel = serial.clone();

        let residual_serial = assemble_residual(
            ExecutionPolicy::Serial,
            &muscl,
            &registry,
            &species,
            &mesh,
            &mut serial,
        )
        .unwrap();
        let residual_parallel = assemble_residual(
            ExecutionPolicy::Parallel,
            &muscl,
            &registry,
            &species,
            &mesh,
            &mut parallel,
        )
        .unwrap();
        assert_eq!(residual_serial, residual_parallel);
        assert_eq!(serial, parallel);

        let report_serial = integrate(
            ExecutionPolicy::Serial,
            &controls,
            &rk,
            &muscl,
            &registry,
            &species,
            &mesh,
            &mut serial,
        )
        .unwrap();
        let report_parallel = integrate(
            ExecutionPolicy::Parallel,
            &controls,
            &rk,
            &muscl,
            &registry,
            &species,
            &mesh,
            &mut parallel,
        )
        .unwrap();
        assert_eq!(report_serial, report_parallel);
        assert_eq!(serial, parallel);
    }
}
