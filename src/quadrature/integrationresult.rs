use serde::Serialize;

use super::integrationerror::IntegrationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum IntegrationStatus {
    Success,
    InvalidTolerance,
    SingularityDetected,
    SubdivisionLimitReached,
    RoundoffLimited,
    /// 積分函數回傳 NaN 或 ±inf，累計值已無意義。
    NonFinite,
}

impl IntegrationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, IntegrationStatus::Success)
    }

    /// 除了 `InvalidTolerance` 與 `NonFinite`，其他狀態都仍有可用的估計值。
    pub fn has_estimate(&self) -> bool {
        !matches!(self, IntegrationStatus::InvalidTolerance | IntegrationStatus::NonFinite)
    }
}

/// 單次積分的完整結果：值、誤差、求值次數、區間數與狀態。
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IntegrationResult {
    pub value: f64,
    pub abserr: f64,
    pub evaluations: usize,
    pub intervals: usize,
    pub status: IntegrationStatus,
    #[serde(skip)]
    pub(crate) limit: usize,
    #[serde(skip)]
    pub(crate) epsabs: f64,
    #[serde(skip)]
    pub(crate) epsrel: f64,
}

impl IntegrationResult {
    pub(crate) fn rejected(epsabs: f64, epsrel: f64) -> IntegrationResult {
        IntegrationResult {
            value: 0.0,
            abserr: 0.0,
            evaluations: 0,
            intervals: 0,
            status: IntegrationStatus::InvalidTolerance,
            limit: 0,
            epsabs,
            epsrel,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn into_result(self) -> Result<IntegrationResult, IntegrationError> {
        let value = self.value;
        let abserr = self.abserr;
        match self.status {
            IntegrationStatus::Success => Ok(self),
            IntegrationStatus::InvalidTolerance => Err(IntegrationError::InvalidTolerance {
                epsabs: self.epsabs,
                epsrel: self.epsrel,
            }),
            IntegrationStatus::SingularityDetected => {
                Err(IntegrationError::SingularityDetected { value, abserr })
            }
            IntegrationStatus::SubdivisionLimitReached => {
                Err(IntegrationError::SubdivisionLimitReached { limit: self.limit, value, abserr })
            }
            IntegrationStatus::RoundoffLimited => {
                Err(IntegrationError::RoundoffLimited { value, abserr })
            }
            IntegrationStatus::NonFinite => {
                Err(IntegrationError::NonFinite { value, abserr })
            }
        }
    }
}
