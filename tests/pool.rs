use std::collections::HashSet;
use std::sync::Barrier;
use std::thread;

use gkquad::configuration::QuadratureLimits;
use gkquad::objectwithuuid::ObjectWithUUID;
use gkquad::quadrature::tolerance::Tolerance;
use gkquad::workspace::workspace::WorkspaceKind;
use gkquad::workspace::workspacepool::{
    MultiThreadedWorkspacePool,
    SingleThreadedWorkspacePool
};

fn small_limits() -> QuadratureLimits {
    QuadratureLimits::new(128, 100, 100_000)
}

#[test]
fn released_workspace_is_handed_out_again() {
    let pool = SingleThreadedWorkspacePool::from_configuration(&small_limits()).unwrap();
    let first = pool.acquire_1d();
    let id = *first.uuid();
    pool.release_1d(first);

    let second = pool.acquire_1d();
    assert_eq!(*second.uuid(), id);
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.in_use(), 1);
    drop(second);
    assert_eq!(pool.idle(), 1);
}

#[test]
fn repeated_integration_allocates_once() {
    let pool = SingleThreadedWorkspacePool::from_configuration(&small_limits()).unwrap();
    let tolerance = Tolerance::relative(1e-8);
    for k in 1..=20 {
        let scale = k as f64;
        let result = pool.integrate_with(|x| (scale * x).cos(), 0.0, 1.0, &tolerance);
        assert!(result.is_success());
    }
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.in_use(), 0);
}

#[test]
fn one_and_n_dimensional_workspaces_share_a_pool() {
    let pool = SingleThreadedWorkspacePool::from_configuration(&small_limits()).unwrap();
    let one = pool.acquire_1d();
    let three = pool.acquire_nd(3).unwrap();
    assert_eq!(three.dimension(), 3);
    assert_eq!(pool.count_kind(WorkspaceKind::OneDimensional), 1);
    assert_eq!(pool.count_kind(WorkspaceKind::MultiDimensional), 1);
    pool.release_nd(three);
    pool.release_1d(one);
    assert!(pool.acquire_nd(1).is_err());
    assert_eq!(pool.idle(), 2);
}

#[test]
fn concurrent_acquisitions_receive_distinct_workspaces() {
    const THREADS: usize = 8;
    let pool = MultiThreadedWorkspacePool::threadsafe_with_limits(small_limits()).unwrap();
    let barrier = Barrier::new(THREADS);

    let ids: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    let workspace = pool.acquire_1d();
                    let id = *workspace.uuid();
                    // 所有執行緒同時持有 workspace
                    barrier.wait();
                    id
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let distinct: HashSet<_> = ids.iter().collect();
    assert_eq!(distinct.len(), THREADS);
    assert_eq!(pool.len(), THREADS);
    assert_eq!(pool.in_use(), 0);
}

#[test]
fn concurrent_integrations_agree() {
    let pool = MultiThreadedWorkspacePool::new_threadsafe();
    let results: Vec<f64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pool.integrate(|x: f64| x.exp(), 0.0, 1.0, 0.0, 1e-12).value))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for value in results {
        assert_eq!(value.to_bits(), results_reference().to_bits());
    }
    assert!(pool.len() >= 1 && pool.len() <= 4);
}

fn results_reference() -> f64 {
    SingleThreadedWorkspacePool::new().integrate(|x: f64| x.exp(), 0.0, 1.0, 0.0, 1e-12).value
}

#[test]
fn zero_limit_is_rejected() {
    let limits = QuadratureLimits::new(0, 100, 1000);
    assert!(SingleThreadedWorkspacePool::from_configuration(&limits).is_err());
    let pool = SingleThreadedWorkspacePool::new();
    assert!(pool.acquire_1d_with_limit(0).is_err());
}
