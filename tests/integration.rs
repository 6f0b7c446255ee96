use std::cell::Cell;
use std::f64::consts::PI;

use approx::assert_relative_eq;

use gkquad::configuration::Configuration;
use gkquad::manager::manager::IManager;
use gkquad::quadrature::integrationerror::IntegrationError;
use gkquad::quadrature::integrationresult::IntegrationStatus;
use gkquad::quadrature::substitution::{
    IdentitySubstitution,
    SemiInfiniteSubstitution
};
use gkquad::workspace::workspacepool::SingleThreadedWorkspacePool;

#[test]
fn constant_integrand_needs_a_single_rule_application() {
    let pool = SingleThreadedWorkspacePool::new();
    let calls = Cell::new(0usize);
    let result = pool.integrate(
        |_x| {
            calls.set(calls.get() + 1);
            3.0
        },
        0.0,
        2.0,
        0.0,
        1e-10,
    );
    assert!(result.is_success());
    assert_relative_eq!(result.value, 6.0, max_relative = 1e-14);
    assert_eq!(result.evaluations, 15);
    assert_eq!(calls.get(), 15);
    assert_eq!(result.intervals, 1);
}

#[test]
fn low_degree_polynomials_are_exact() {
    let pool = SingleThreadedWorkspacePool::new();
    let linear = pool.integrate(|x| x, 0.0, 1.0, 0.0, 1e-10);
    let quadratic = pool.integrate(|x| x * x, 0.0, 1.0, 0.0, 1e-10);
    assert_relative_eq!(linear.value, 0.5, max_relative = 1e-14);
    assert_relative_eq!(quadratic.value, 1.0 / 3.0, max_relative = 1e-14);
    assert_eq!(quadratic.intervals, 1);
}

#[test]
fn reversed_bounds_negate_the_result() {
    let pool = SingleThreadedWorkspacePool::new();
    let f = |x: f64| (5.0 * x).sin() * x.exp();
    let forward = pool.integrate(f, 0.0, 3.0, 0.0, 1e-10);
    let backward = pool.integrate(f, 3.0, 0.0, 0.0, 1e-10);
    assert_eq!(backward.value, -forward.value);
    assert_eq!(backward.abserr, forward.abserr);
    assert_eq!(backward.evaluations, forward.evaluations);
}

#[test]
fn tighter_tolerance_never_needs_fewer_evaluations() {
    let pool = SingleThreadedWorkspacePool::new();
    let f = |x: f64| (30.0 * x).cos();
    let exact = (60.0_f64).sin() / 30.0;

    let mut previous = 0;
    for epsrel in [1e-3, 1e-6, 1e-9] {
        let result = pool.integrate(f, 0.0, 2.0, 0.0, epsrel);
        assert!(result.is_success());
        assert!((result.value - exact).abs() <= 10.0 * epsrel * exact.abs());
        assert!(result.evaluations >= previous);
        assert_eq!(result.evaluations, 15 + 30 * (result.intervals - 1));
        previous = result.evaluations;
    }
}

#[test]
fn unattainable_tolerance_is_rejected_without_calls() {
    let pool = SingleThreadedWorkspacePool::new();
    let calls = Cell::new(0usize);
    let result = pool.integrate(
        |x| {
            calls.set(calls.get() + 1);
            x
        },
        0.0,
        1.0,
        0.0,
        0.0,
    );
    assert_eq!(result.status, IntegrationStatus::InvalidTolerance);
    assert_eq!(calls.get(), 0);
    assert!(matches!(result.into_result(), Err(IntegrationError::InvalidTolerance { .. })));
}

#[test]
fn integrable_endpoint_singularity_is_resolved() {
    let pool = SingleThreadedWorkspacePool::new();
    let result = pool.integrate(|x| 1.0 / x.sqrt(), 0.0, 1.0, 0.0, 1e-10);
    assert!(result.status.has_estimate());
    assert!(result.value.is_finite());
    assert!((result.value - 2.0).abs() < 1e-6);
}

#[test]
fn non_integrable_singularity_raises_a_flag() {
    let pool = SingleThreadedWorkspacePool::new();
    let result = pool.integrate(|x| 1.0 / x, 0.0, 1.0, 0.0, 1e-10);
    assert!(!result.is_success());
    assert!(result.intervals <= pool.limits().gk_limit());
    assert!(result.into_result().is_err());
}

#[test]
fn identity_substitution_matches_direct_integration() {
    let pool = SingleThreadedWorkspacePool::new();
    let f = |x: f64| x.sin() * x;
    let direct = pool.integrate(f, 0.0, PI, 0.0, 1e-10);
    let substituted = pool.integrate_substituted(f, 0.0, PI, 0.0, 1e-10, &IdentitySubstitution);
    assert_eq!(direct.value, substituted.value);
    assert_eq!(direct.evaluations, substituted.evaluations);
}

#[test]
fn semi_infinite_range_via_substitution() {
    let pool = SingleThreadedWorkspacePool::new();
    let result = pool.integrate_substituted(
        |x: f64| (-x).exp(),
        0.0,
        f64::INFINITY,
        0.0,
        1e-10,
        &SemiInfiniteSubstitution::new(0.0),
    );
    assert!(result.is_success());
    assert_relative_eq!(result.value, 1.0, max_relative = 1e-8);
}

#[test]
fn bound_below_semi_infinite_origin_is_non_finite() {
    let pool = SingleThreadedWorkspacePool::new();
    let result = pool.integrate_substituted(
        |x: f64| (-x).exp(),
        -1.0,
        f64::INFINITY,
        0.0,
        1e-10,
        &SemiInfiniteSubstitution::new(0.0),
    );
    assert_eq!(result.status, IntegrationStatus::NonFinite);
    assert!(matches!(result.into_result(), Err(IntegrationError::NonFinite { .. })));
}

#[test]
fn nan_integrand_is_reported_as_non_finite() {
    let pool = SingleThreadedWorkspacePool::new();
    let result = pool.integrate(|x: f64| (x - 2.0).sqrt(), 0.0, 1.0, 0.0, 1e-10);
    assert_eq!(result.status, IntegrationStatus::NonFinite);
    assert_eq!(result.evaluations, 15);
}

#[test]
fn bundled_configuration_drives_a_pool() {
    let config_path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/config.json");
    let config = Configuration::new();
    config.from_reader(config_path).unwrap();

    let pool = SingleThreadedWorkspacePool::from_configuration(&config.limits()).unwrap();
    assert_eq!(pool.limits().gk_limit(), 8192);

    let substitution = config.substitution_manager().get("semi_infinite").unwrap();
    let tolerance = config.tolerance();
    let result = pool.integrate_substituted(
        |x: f64| 1.0 / (1.0 + x * x),
        0.0,
        f64::INFINITY,
        tolerance.epsabs(),
        tolerance.epsrel(),
        substitution.as_ref(),
    );
    assert_relative_eq!(result.value, PI / 2.0, max_relative = 1e-8);
}
