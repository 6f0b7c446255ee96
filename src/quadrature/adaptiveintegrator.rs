use super::gausskronrod::{
    gauss_kronrod_15,
    GK15_EVALUATIONS
};
use super::integrationresult::{
    IntegrationResult,
    IntegrationStatus
};
use super::intervalheap::{
    Interval,
    IntervalHeap
};
use super::tolerance::Tolerance;

/// 所有存活區間的累計積分與累計誤差，逐步更新；結束時再以
/// `IntervalHeap::sum_results` 重新加總。
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningTotals {
    pub area: f64,
    pub errsum: f64,
}

impl RunningTotals {
    fn replace(&mut self, removed: &Interval, left: &Interval, right: &Interval) {
        self.errsum += (left.error + right.error) - removed.error;
        self.area += (left.estimate + right.estimate) - removed.estimate;
    }

    fn is_finite(&self) -> bool {
        self.area.is_finite() && self.errsum.is_finite()
    }
}

/// 二分過程中區間兩端是否已在數值上塌縮到同一點附近。
fn is_degenerate(a1: f64, a2: f64, b2: f64) -> bool {
    let tmp = (1.0 + 100.0 * f64::EPSILON) * (a2.abs() + 1000.0 * f64::MIN_POSITIVE);
    a1.abs() <= tmp && b2.abs() <= tmp
}

// ─────────────────────────────────────────────────────────────────────────────
// AdaptiveIntegrator
// ─────────────────────────────────────────────────────────────────────────────
//
// Initializing → Subdividing → Converged | Stalled | Exhausted
//
// 每一輪取出誤差最大的區間二分，兩半各套用一次 GK15。
// 奇異點 / 區間數上限的旗標一旦舉起就是 sticky 的，迴圈在下一次檢查條件時結束，
// 不會再多做一次二分。

pub struct AdaptiveIntegrator<'w> {
    heap: &'w mut IntervalHeap,
    limit: usize,
}

impl<'w> AdaptiveIntegrator<'w> {
    pub fn new(heap: &'w mut IntervalHeap) -> AdaptiveIntegrator<'w> {
        let limit = heap.capacity();
        AdaptiveIntegrator { heap, limit }
    }

    /// 本次積分的區間數上限，會被截斷到 heap 的 capacity。
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, self.heap.capacity().max(1));
        self
    }

    pub fn run<F>(&mut self, f: &F, a: f64, b: f64, tolerance: &Tolerance) -> IntegrationResult
    where
        F: Fn(f64) -> f64,
    {
        // ── Initializing ────────────────────────────────────────────────────
        if let Err(error) = tolerance.validate() {
            tracing::warn!(%error, "integration rejected before evaluation");
            return IntegrationResult::rejected(tolerance.epsabs(), tolerance.epsrel());
        }

        let (low, high, sign) = if a > b { (b, a, -1.0) } else { (a, b, 1.0) };

        let first = gauss_kronrod_15(f, low, high);
        let mut evaluations = GK15_EVALUATIONS;
        self.heap.reset(self.limit, Interval::new(low, high, first.estimate, first.abserr));

        let mut totals = RunningTotals {
            area: first.estimate,
            errsum: first.abserr,
        };
        let mut threshold = tolerance.threshold(totals.area);
        let mut flag: Option<IntegrationStatus> = None;

        if !totals.is_finite() {
            flag = Some(IntegrationStatus::NonFinite);
        } else if totals.errsum > threshold && self.heap.is_full() {
            flag = Some(IntegrationStatus::SubdivisionLimitReached);
        }

        // ── Subdividing ─────────────────────────────────────────────────────
        while flag.is_none() && totals.errsum > threshold {
            let Some(current) = self.heap.max_interval() else {
                break;
            };

            let a1 = current.low;
            let b1 = current.midpoint();
            let a2 = b1;
            let b2 = current.high;

            let rule1 = gauss_kronrod_15(f, a1, b1);
            let rule2 = gauss_kronrod_15(f, a2, b2);
            evaluations += 2 * GK15_EVALUATIONS;

            let left = Interval::new(a1, b1, rule1.estimate, rule1.abserr);
            let right = Interval::new(a2, b2, rule2.estimate, rule2.abserr);
            totals.replace(&current, &left, &right);
            threshold = tolerance.threshold(totals.area);

            if totals.errsum > threshold {
                if is_degenerate(a1, a2, b2) {
                    flag = Some(IntegrationStatus::SingularityDetected);
                }
                // split 之後區間數會 +1
                if self.heap.len() + 1 >= self.heap.limit() {
                    flag = Some(IntegrationStatus::SubdivisionLimitReached);
                }
            }
            if !totals.is_finite() {
                flag = Some(IntegrationStatus::NonFinite);
            }

            self.heap.split_max(left, right);
        }

        // ── Terminal ────────────────────────────────────────────────────────
        let (area, errsum) = self.heap.sum_results();

        let status = if !area.is_finite() || !errsum.is_finite() {
            IntegrationStatus::NonFinite
        } else if errsum <= threshold {
            IntegrationStatus::Success
        } else {
            flag.unwrap_or(IntegrationStatus::RoundoffLimited)
        };

        if !status.is_success() {
            tracing::warn!(
                ?status,
                value = sign * area,
                abserr = errsum,
                intervals = self.heap.len(),
                evaluations,
                "adaptive integration did not reach the requested tolerance"
            );
        }

        IntegrationResult {
            value: sign * area,
            abserr: errsum,
            evaluations,
            intervals: self.heap.len(),
            status,
            limit: self.heap.limit(),
            epsabs: tolerance.epsabs(),
            epsrel: tolerance.epsrel(),
        }
    }
}
