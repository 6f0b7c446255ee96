use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("n-dimensional workspace requires dimension >= 2, got {0}")]
    InvalidDimension(usize),

    #[error("workspace limit must be positive")]
    InvalidLimit,

    #[error("region storage is full ({0} regions)")]
    RegionCapacityExceeded(usize),

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
