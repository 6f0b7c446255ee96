use std::cell::{
    Ref,
    RefCell,
    RefMut
};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize
};

use crate::manager::managererror::{
    ManagerError,
    parse_json_value
};
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::quadrature::substitution::Substitution;
use crate::quadrature::substitutionmanager::SubstitutionManager;
use crate::quadrature::tolerance::Tolerance;

/// 一維 workspace 預設可容納的最大區間數。
pub const GK_LIMIT: usize = 8192;
pub const GM_MINPTS: usize = 1000;
pub const GM_MAXPTS: usize = 10_000_000;

fn default_gk_limit() -> usize { GK_LIMIT }
fn default_gm_minpts() -> usize { GM_MINPTS }
fn default_gm_maxpts() -> usize { GM_MAXPTS }


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadratureLimits {
    #[serde(default = "default_gk_limit")]
    gk_limit: usize,
    #[serde(default = "default_gm_minpts")]
    gm_minpts: usize,
    #[serde(default = "default_gm_maxpts")]
    gm_maxpts: usize
}


impl QuadratureLimits {
    pub fn new(gk_limit: usize, gm_minpts: usize, gm_maxpts: usize) -> QuadratureLimits {
        QuadratureLimits { gk_limit, gm_minpts, gm_maxpts }
    }

    pub fn gk_limit(&self) -> usize {
        self.gk_limit
    }

    pub fn gm_minpts(&self) -> usize {
        self.gm_minpts
    }

    pub fn gm_maxpts(&self) -> usize {
        self.gm_maxpts
    }
}

impl Default for QuadratureLimits {
    fn default() -> Self {
        QuadratureLimits::new(GK_LIMIT, GM_MINPTS, GM_MAXPTS)
    }
}


#[derive(Deserialize)]
struct ConfigurationJsonProp {
    #[serde(default)]
    limits: Option<QuadratureLimits>,
    #[serde(default)]
    tolerance: Option<Tolerance>,
    #[serde(default)]
    substitution: Vec<serde_json::Value>
}

pub struct Configuration {
    limits_cell: RefCell<QuadratureLimits>,
    tolerance_cell: RefCell<Tolerance>,
    substitution_manager_cell: RefCell<Manager<Arc<dyn Substitution>>>
}


impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            limits_cell: RefCell::new(QuadratureLimits::default()),
            tolerance_cell: RefCell::new(Tolerance::default()),
            substitution_manager_cell: RefCell::new(SubstitutionManager::new())
        }
    }

    pub fn limits(&self) -> QuadratureLimits {
        *self.limits_cell.borrow()
    }

    pub fn tolerance(&self) -> Tolerance {
        *self.tolerance_cell.borrow()
    }

    pub fn substitution_manager(&self) -> Ref<'_, Manager<Arc<dyn Substitution>>> {
        self.substitution_manager_cell.borrow()
    }

    pub fn substitution_manager_mut(&self) -> RefMut<'_, Manager<Arc<dyn Substitution>>> {
        self.substitution_manager_cell.borrow_mut()
    }

    pub fn from_reader(&self, file_path: &str) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        self.from_json_value(json_value)
    }

    /// 缺少的段落沿用目前設定；任何一段不合法時整份設定都不套用。
    pub fn from_json_value(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let json_prop: ConfigurationJsonProp = parse_json_value(json_value)?;
        if let Some(tolerance) = json_prop.tolerance.as_ref() {
            tolerance
                .validate()
                .map_err(|error| ManagerError::invalid_parameter("tolerance", error.to_string()))?;
        }
        if let Some(limits) = json_prop.limits.as_ref() {
            if limits.gk_limit() == 0 {
                return Err(ManagerError::invalid_parameter("limits", "gk_limit must be positive"));
            }
        }

        let substitution_manager = self.substitution_manager_cell.borrow();
        let substitutions = json_prop.substitution
            .into_iter()
            .map(|j| substitution_manager.build_obj_from_json(j))
            .collect::<Result<Vec<_>, ManagerError>>()?;

        for (name, substitution) in substitutions {
            substitution_manager.insert(&name, substitution);
        }
        if let Some(limits) = json_prop.limits {
            *self.limits_cell.borrow_mut() = limits;
        }
        if let Some(tolerance) = json_prop.tolerance {
            *self.tolerance_cell.borrow_mut() = tolerance;
        }
        tracing::debug!(
            substitutions = substitution_manager.len(),
            "configuration loaded"
        );
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}
