use std::cell::{
    RefCell,
    RefMut
};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::managererror::ManagerError;
use super::namedobject::NamedJsonObject;


/// Name-keyed store of objects built from JSON definitions.
pub trait IManager<V> where
    V: Clone {
    fn map(&self) -> RefMut<'_, HashMap<String, V>>;

    fn insert_obj_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError>;

    fn get(&self, name: &str) -> Result<V, ManagerError> {
        let map = self.map();
        map.get(name)
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

    fn insert_obj_from_json_vec(&self, json_vec: &[serde_json::Value]) -> Result<(), ManagerError> {
        for j in json_vec.iter() {
            self.insert_obj_from_json(j.clone())?;
        }
        Ok(())
    }

    /// Reads either one definition or an array of definitions.
    fn from_reader<P: AsRef<Path>>(&self, file_path: P) -> Result<(), ManagerError> where
        Self: Sized {
        let file = File::open(file_path).map_err(ManagerError::IOError)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader).map_err(ManagerError::JsonParseError)?;
        if json_value.is_array() {
            let json_array: Vec<serde_json::Value> = ManagerError::from_json_or_json_parse_error(json_value)?;
            self.insert_obj_from_json_vec(&json_array)
        } else {
            self.insert_obj_from_json(json_value)
        }
    }
}


pub struct Manager<V> {
    map_cell: RefCell<HashMap<String, V>>,
    get_obj_from_json: fn(serde_json::Value) -> Result<V, ManagerError>
}


impl <V> Manager<V> where
    V: Clone {
    pub fn new(get_obj_from_json: fn(serde_json::Value) -> Result<V, ManagerError>) -> Manager<V> {
        Manager { map_cell: RefCell::new(HashMap::new()), get_obj_from_json }
    }
}

impl <V> IManager<V> for Manager<V> where
    V: Clone {
    fn map(&self) -> RefMut<'_, HashMap<String, V>> {
        self.map_cell.borrow_mut()
    }

    fn insert_obj_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let named_object: NamedJsonObject = ManagerError::from_json_or_json_parse_error(json_value.clone())?;
        let v = (self.get_obj_from_json)(json_value)?;
        self.map().insert(named_object.name().to_owned(), v);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct ScaleJsonProp {
        factor: f64
    }

    fn get_factor_from_json(json_value: serde_json::Value) -> Result<f64, ManagerError> {
        let prop: ScaleJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
        Ok(prop.factor)
    }

    #[test]
    fn stores_objects_under_their_names() {
        let manager = Manager::new(get_factor_from_json);
        manager
            .insert_obj_from_json_vec(&[
                json!({"name": "b", "factor": 2.0}),
                json!({"name": "a", "factor": 0.5}),
            ])
            .unwrap();
        assert_eq!(manager.get("b").unwrap(), 2.0);
        assert!(manager.contains("a"));
        assert_eq!(manager.names(), vec!["a".to_owned(), "b".to_owned()]);
        assert!(matches!(manager.get("c"), Err(ManagerError::NameNotFoundError(_))));
    }

    #[test]
    fn unnamed_definitions_are_parse_errors() {
        let manager = Manager::new(get_factor_from_json);
        let result = manager.insert_obj_from_json(json!({"factor": 1.0}));
        assert!(matches!(result, Err(ManagerError::JsonParseError(_))));
    }
}
