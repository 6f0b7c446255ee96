use std::sync::Arc;

use serde::Deserialize;

use crate::manager::manager::Manager;
use crate::manager::managererror::{
    ManagerError,
    parse_json_value
};
use crate::quadrature::substitution::{
    IdentitySubstitution,
    LinearSubstitution,
    LogSubstitution,
    SemiInfiniteSubstitution,
    Substitution
};

#[derive(Deserialize)]
pub enum SubstitutionType {
    Identity,
    Linear,
    Log,
    SemiInfinite
}


#[derive(Deserialize)]
struct SubstitutionTypedObject {
    #[serde(rename = "type")]
    substitution_type: SubstitutionType
}


#[derive(Deserialize)]
struct LinearSubstitutionJsonProp {
    scale: f64,
    #[serde(default)]
    shift: f64
}


#[derive(Deserialize)]
struct SemiInfiniteSubstitutionJsonProp {
    #[serde(default)]
    origin: f64
}


fn get_substitution_from_json(name: &str, json_value: serde_json::Value) -> Result<Arc<dyn Substitution>, ManagerError> {
    let typed_object: SubstitutionTypedObject = parse_json_value(json_value.clone())?;
    let substitution: Arc<dyn Substitution> = match typed_object.substitution_type {
        SubstitutionType::Identity => Arc::new(IdentitySubstitution),
        SubstitutionType::Linear => {
            let json_prop: LinearSubstitutionJsonProp = parse_json_value(json_value)?;
            let linear = LinearSubstitution::new(json_prop.scale, json_prop.shift)
                .ok_or_else(|| ManagerError::invalid_parameter(name, "scale must be finite and non-zero"))?;
            Arc::new(linear)
        },
        SubstitutionType::Log => Arc::new(LogSubstitution),
        SubstitutionType::SemiInfinite => {
            let json_prop: SemiInfiniteSubstitutionJsonProp = parse_json_value(json_value)?;
            if !json_prop.origin.is_finite() {
                return Err(ManagerError::invalid_parameter(name, "origin must be finite"));
            }
            Arc::new(SemiInfiniteSubstitution::new(json_prop.origin))
        }
    };
    Ok(substitution)
}


pub struct SubstitutionManager;

impl SubstitutionManager {
    pub fn new() -> Manager<Arc<dyn Substitution>> {
        Manager::new(get_substitution_from_json)
    }
}
