use serde::{
    Deserialize,
    Serialize
};

use super::integrationerror::IntegrationError;

/// 最小可接受的相對誤差：50·ε 與 5×10⁻²⁹ 兩者取大。
pub const MIN_EPSREL: f64 = if 50.0 * f64::EPSILON > 0.5e-28 {
    50.0 * f64::EPSILON
} else {
    0.5e-28
};

pub const DEFAULT_EPSABS: f64 = 0.0;
pub const DEFAULT_EPSREL: f64 = 1e-10;

/// 精度要求。停止條件為 errsum ≤ max(epsabs, epsrel·|area|)。
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    #[serde(default = "default_epsabs")]
    epsabs: f64,
    #[serde(default = "default_epsrel")]
    epsrel: f64,
}

fn default_epsabs() -> f64 {
    DEFAULT_EPSABS
}

fn default_epsrel() -> f64 {
    DEFAULT_EPSREL
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::new(DEFAULT_EPSABS, DEFAULT_EPSREL)
    }
}

impl Tolerance {
    pub fn new(epsabs: f64, epsrel: f64) -> Tolerance {
        Tolerance { epsabs, epsrel }
    }

    pub fn absolute(epsabs: f64) -> Tolerance {
        Tolerance::new(epsabs, 0.0)
    }

    pub fn relative(epsrel: f64) -> Tolerance {
        Tolerance::new(0.0, epsrel)
    }

    pub fn epsabs(&self) -> f64 {
        self.epsabs
    }

    pub fn epsrel(&self) -> f64 {
        self.epsrel
    }

    /// 兩者都比浮點極限寬鬆時（epsabs ≤ 0 且 epsrel 太小）拒絕。
    pub fn validate(&self) -> Result<(), IntegrationError> {
        if self.epsabs <= 0.0 && self.epsrel < MIN_EPSREL {
            return Err(IntegrationError::InvalidTolerance {
                epsabs: self.epsabs,
                epsrel: self.epsrel,
            });
        }
        Ok(())
    }

    pub fn threshold(&self, area: f64) -> f64 {
        self.epsabs.max(self.epsrel * area.abs())
    }
}
