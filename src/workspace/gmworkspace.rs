use nalgebra::DVector;
use uuid::Uuid;

use crate::objectwithuuid::ObjectWithUUID;

use super::poolerror::PoolError;

/// n 維 Genz-Malik 的一個子區域。
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub center: DVector<f64>,
    pub halfwidth: DVector<f64>,
    pub estimate: f64,
    pub error: f64,
}

impl Region {
    pub fn volume(&self) -> f64 {
        self.halfwidth.iter().map(|h| 2.0 * h.abs()).product()
    }
}

/// n 維積分的 workspace（只負責儲存空間的配置與回收，不含積分規則本身）。
///
/// 區域容量由 `maxpts / rule_points` 決定，但一開始只預留 `minpts / rule_points` 個，
/// 以免低維度、小 `maxpts` 的情況配置過多記憶體。
pub struct GmWorkspace {
    uuid: Uuid,
    dimension: usize,
    minpts: usize,
    maxpts: usize,
    regions: Vec<Region>,
}

impl GmWorkspace {
    pub fn new(dimension: usize, minpts: usize, maxpts: usize) -> Result<GmWorkspace, PoolError> {
        if dimension < 2 || dimension > usize::BITS as usize - 2 {
            return Err(PoolError::InvalidDimension(dimension));
        }
        let points = rule_points(dimension);
        let reserve = (minpts / points).max(1);
        Ok(GmWorkspace {
            uuid: Uuid::new_v4(),
            dimension,
            minpts,
            maxpts,
            regions: Vec::with_capacity(reserve),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn minpts(&self) -> usize {
        self.minpts
    }

    pub fn maxpts(&self) -> usize {
        self.maxpts
    }

    /// 每個區域套用一次規則所需的求值次數：2^n + 2n² + 2n + 1。
    pub fn rule_points(&self) -> usize {
        rule_points(self.dimension)
    }

    pub fn max_regions(&self) -> usize {
        (self.maxpts / self.rule_points()).max(1)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn reset(&mut self) {
        self.regions.clear();
    }

    /// 新增一個區域，回傳其索引。
    pub fn push_region(
        &mut self,
        center: DVector<f64>,
        halfwidth: DVector<f64>,
        estimate: f64,
        error: f64,
    ) -> Result<usize, PoolError> {
        if center.len() != self.dimension || halfwidth.len() != self.dimension {
            return Err(PoolError::DimensionMismatch {
                expected: self.dimension,
                found: center.len().max(halfwidth.len()),
            });
        }
        if self.regions.len() >= self.max_regions() {
            return Err(PoolError::RegionCapacityExceeded(self.max_regions()));
        }
        self.regions.push(Region { center, halfwidth, estimate, error });
        Ok(self.regions.len() - 1)
    }

    /// 以整個超矩形 [lower, upper] 作為第一個區域。
    pub fn seed(&mut self, lower: &[f64], upper: &[f64]) -> Result<usize, PoolError> {
        let lower = DVector::from_column_slice(lower);
        let upper = DVector::from_column_slice(upper);
        if lower.len() != upper.len() {
            return Err(PoolError::DimensionMismatch {
                expected: lower.len(),
                found: upper.len(),
            });
        }
        self.reset();
        let center = (&lower + &upper) * 0.5;
        let halfwidth = (&upper - &lower) * 0.5;
        self.push_region(center, halfwidth, 0.0, f64::INFINITY)
    }
}

fn rule_points(dimension: usize) -> usize {
    (1usize << dimension) + 2 * dimension * dimension + 2 * dimension + 1
}

impl ObjectWithUUID for GmWorkspace {
    fn uuid(&self) -> &Uuid {
        &self.uuid
    }
}
