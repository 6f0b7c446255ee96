use thiserror::Error;

/// 積分過程中可能出現的狀況。
///
/// 只有 `InvalidTolerance` 會在求值前直接中止；`NonFinite` 的值不可用，其他三種都附帶最佳估計值，
/// 由 `IntegrationResult::into_result` 轉成 `Err` 供偏好 `?` 的呼叫端使用。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("tolerance cannot be achieved with epsabs = {epsabs:e}, epsrel = {epsrel:e}")]
    InvalidTolerance { epsabs: f64, epsrel: f64 },

    #[error("non-integrable singularity or bad integrand behavior suspected (value = {value}, abserr = {abserr:e})")]
    SingularityDetected { value: f64, abserr: f64 },

    #[error("maximum number of subdivisions ({limit}) reached (value = {value}, abserr = {abserr:e})")]
    SubdivisionLimitReached { limit: usize, value: f64, abserr: f64 },

    #[error("roundoff error prevents the requested tolerance from being achieved (value = {value}, abserr = {abserr:e})")]
    RoundoffLimited { value: f64, abserr: f64 },

    #[error("integrand produced a non-finite value (value = {value}, abserr = {abserr:e})")]
    NonFinite { value: f64, abserr: f64 },
}
