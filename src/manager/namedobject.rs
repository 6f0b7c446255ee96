use serde::{
    Serialize,
    Deserialize
};

/// JSON 物件中所有具名項目共有的 `name` 欄位。
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedJsonObject {
    name: String
}


impl NamedJsonObject {
    pub fn new(name: impl Into<String>) -> NamedJsonObject {
        NamedJsonObject { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
