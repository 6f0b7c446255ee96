/// 一個子區間及其局部積分與誤差估計。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
    pub estimate: f64,
    pub error: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64, estimate: f64, error: f64) -> Interval {
        Interval { low, high, estimate, error }
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.low + self.high)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IntervalHeap
// ─────────────────────────────────────────────────────────────────────────────
//
// 區間本身存在固定容量的 arena（`intervals`），只會在尾端追加；
// 排序資訊另外存在以 error 為 key 的 binary max-heap（`order`，存 arena 索引）。
//
//   取出最大誤差：O(1)（order[0]）
//   一分為二：根節點的 slot 改寫為左半、右半追加到 arena 尾端，各做一次 sift，O(log n)
//
// arena 在建構時一次配置 `capacity` 個元素，之後 reset / split 都不會重新配置。

pub struct IntervalHeap {
    capacity: usize,
    limit: usize,
    intervals: Vec<Interval>,
    order: Vec<usize>,
}

impl IntervalHeap {
    pub fn new(capacity: usize) -> IntervalHeap {
        IntervalHeap {
            capacity,
            limit: capacity,
            intervals: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// 配置的最大區間數。
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 本次積分允許的最大區間數（≤ capacity）。
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.intervals.len() >= self.limit
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// 清空並以單一區間重新開始；`limit` 會被截斷到 capacity。
    pub fn reset(&mut self, limit: usize, first: Interval) {
        self.limit = limit.clamp(1, self.capacity.max(1));
        self.intervals.clear();
        self.order.clear();
        self.intervals.push(first);
        self.order.push(0);
    }

    /// 目前誤差最大的區間（以值回傳）。
    pub fn max_interval(&self) -> Option<Interval> {
        self.order.first().map(|&idx| self.intervals[idx])
    }

    /// 以 `left` 取代最大誤差區間，並追加 `right`。
    ///
    /// 呼叫前必須確認 `!is_full()`；滿了則回傳 `false` 且不做任何修改。
    pub fn split_max(&mut self, left: Interval, right: Interval) -> bool {
        if self.order.is_empty() || self.is_full() {
            return false;
        }

        let root = self.order[0];
        self.intervals[root] = left;
        self.sift_down(0);

        let idx = self.intervals.len();
        self.intervals.push(right);
        self.order.push(idx);
        self.sift_up(self.order.len() - 1);
        true
    }

    /// 直接加總所有區間，得到 (area, errsum)，用來消除逐步累加的捨入誤差。
    pub fn sum_results(&self) -> (f64, f64) {
        self.intervals.iter().fold((0.0, 0.0), |(area, errsum), interval| {
            (area + interval.estimate, errsum + interval.error)
        })
    }

    #[cfg(test)]
    pub(crate) fn storage_ptr(&self) -> *const Interval {
        self.intervals.as_ptr()
    }

    fn error_at(&self, heap_pos: usize) -> f64 {
        self.intervals[self.order[heap_pos]].error
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.error_at(pos).total_cmp(&self.error_at(parent)).is_gt() {
                self.order.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let n = self.order.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut largest = pos;
            if left < n && self.error_at(left).total_cmp(&self.error_at(largest)).is_gt() {
                largest = left;
            }
            if right < n && self.error_at(right).total_cmp(&self.error_at(largest)).is_gt() {
                largest = right;
            }
            if largest == pos {
                break;
            }
            self.order.swap(pos, largest);
            pos = largest;
        }
    }
}
