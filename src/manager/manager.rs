use std::cell::{
    Ref,
    RefCell
};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

use super::managererror::{
    ManagerError,
    parse_json_value
};
use super::namedobject::NamedJsonObject;


/// 以名稱索引、從 JSON 建立物件的容器。
pub trait IManager<V> where
    V: Clone {
    fn map(&self) -> Ref<'_, HashMap<String, V>>;

    fn insert(&self, name: &str, value: V);

    /// 只建立物件、不寫入容器，回傳 (名稱, 物件)。
    fn build_obj_from_json(&self, json_value: serde_json::Value) -> Result<(String, V), ManagerError>;

    fn insert_obj_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let (name, value) = self.build_obj_from_json(json_value)?;
        self.insert(&name, value);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<V, ManagerError> {
        self.map()
            .get(name)
            .cloned()
            .ok_or_else(|| ManagerError::map_elem_not_found(name))
    }

    fn contains(&self, name: &str) -> bool {
        self.map().contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map().keys().cloned().collect();
        names.sort();
        names
    }

    /// 全部建立成功才寫入；任一項失敗時容器維持原狀。
    fn insert_obj_from_json_vec(&self, json_vec: &[serde_json::Value]) -> Result<(), ManagerError> {
        let built = json_vec
            .iter()
            .map(|j| self.build_obj_from_json(j.clone()))
            .collect::<Result<Vec<(String, V)>, ManagerError>>()?;
        for (name, value) in built {
            self.insert(&name, value);
        }
        Ok(())
    }

    /// 檔案內容可以是單一物件或物件陣列。
    fn from_reader(&self, file_path: &str) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        if json_value.is_array() {
            let json_array: Vec<serde_json::Value> = parse_json_value(json_value)?;
            self.insert_obj_from_json_vec(&json_array)
        } else {
            self.insert_obj_from_json(json_value)
        }
    }
}


pub struct Manager<V> {
    map_cell: RefCell<HashMap<String, V>>,
    get_obj_from_json: fn(&str, serde_json::Value) -> Result<V, ManagerError>
}


impl <V> Manager<V> where
    V: Clone {
    pub fn new(get_obj_from_json: fn(&str, serde_json::Value) -> Result<V, ManagerError>) -> Manager<V> {
        Manager {map_cell: RefCell::new(HashMap::new()), get_obj_from_json}
    }

    pub fn len(&self) -> usize {
        self.map_cell.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map_cell.borrow().is_empty()
    }
}

impl <V> IManager<V> for Manager<V> where
    V: Clone {
    fn map(&self) -> Ref<'_, HashMap<String, V>> {
        self.map_cell.borrow()
    }

    fn insert(&self, name: &str, value: V) {
        self.map_cell.borrow_mut().insert(name.to_owned(), value);
    }

    fn build_obj_from_json(&self, json_value: serde_json::Value) -> Result<(String, V), ManagerError> {
        let named_object: NamedJsonObject = parse_json_value(json_value.clone())?;
        let v = (self.get_obj_from_json)(named_object.name(), json_value)?;
        Ok((named_object.name().to_owned(), v))
    }
}
