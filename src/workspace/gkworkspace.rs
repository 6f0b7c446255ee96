use uuid::Uuid;

use crate::objectwithuuid::ObjectWithUUID;
use crate::quadrature::adaptiveintegrator::AdaptiveIntegrator;
use crate::quadrature::integrationresult::IntegrationResult;
use crate::quadrature::intervalheap::IntervalHeap;
use crate::quadrature::substitution::{
    compose,
    Substitution
};
use crate::quadrature::tolerance::Tolerance;

/// 一維 adaptive Gauss-Kronrod 的 workspace。
///
/// 區間 arena 在建構時一次配置 `capacity` 個元素；之後每次積分只 reset，不重新配置。
pub struct GkWorkspace {
    uuid: Uuid,
    heap: IntervalHeap,
}

impl GkWorkspace {
    pub fn new(capacity: usize) -> GkWorkspace {
        GkWorkspace {
            uuid: Uuid::new_v4(),
            heap: IntervalHeap::new(capacity.max(1)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    pub fn heap(&self) -> &IntervalHeap {
        &self.heap
    }

    /// 積分 f 從 a 到 b，使用全部 capacity 作為區間數上限。
    pub fn integrate<F>(&mut self, f: &F, a: f64, b: f64, tolerance: &Tolerance) -> IntegrationResult
    where
        F: Fn(f64) -> f64,
    {
        AdaptiveIntegrator::new(&mut self.heap).run(f, a, b, tolerance)
    }

    pub fn integrate_with_limit<F>(
        &mut self,
        f: &F,
        a: f64,
        b: f64,
        tolerance: &Tolerance,
        limit: usize,
    ) -> IntegrationResult
    where
        F: Fn(f64) -> f64,
    {
        AdaptiveIntegrator::new(&mut self.heap)
            .with_limit(limit)
            .run(f, a, b, tolerance)
    }

    /// 在 u 空間中積分 f(forward(u)) · derivative(u)，上下限為 to_u(a)、to_u(b)。
    pub fn integrate_substituted<F, S>(
        &mut self,
        f: &F,
        a: f64,
        b: f64,
        tolerance: &Tolerance,
        substitution: &S,
    ) -> IntegrationResult
    where
        F: Fn(f64) -> f64,
        S: Substitution + ?Sized,
    {
        let g = compose(f, substitution);
        let ua = substitution.to_u(a);
        let ub = substitution.to_u(b);
        self.integrate(&g, ua, ub, tolerance)
    }
}

impl ObjectWithUUID for GkWorkspace {
    fn uuid(&self) -> &Uuid {
        &self.uuid
    }
}
