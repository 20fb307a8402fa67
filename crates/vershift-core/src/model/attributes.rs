use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute map for resources and operation parameters
///
/// Stores attribute values as JSON values under their attribute names.
/// Iteration order is the attribute-name order, which keeps rewrite output
/// and derived operation transformers deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AttributeModel {
    data: BTreeMap<String, serde_json::Value>,
}

impl AttributeModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    /// Get a value by attribute name
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.data.get(name)
    }

    /// Set a value by attribute name
    pub fn set(&mut self, name: String, value: serde_json::Value) {
        self.data.insert(name, value);
    }

    /// Remove a value by attribute name
    pub fn remove(&mut self, name: &str) -> Option<serde_json::Value> {
        self.data.remove(name)
    }

    /// Check if an attribute exists
    pub fn contains(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// All attribute names, in order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// All (name, value) pairs, in attribute-name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.data.iter()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the model has no attributes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for AttributeModel {
    fn from(data: BTreeMap<String, serde_json::Value>) -> Self {
        Self { data }
    }
}

impl From<AttributeModel> for BTreeMap<String, serde_json::Value> {
    fn from(model: AttributeModel) -> Self {
        model.data
    }
}

impl FromIterator<(String, serde_json::Value)> for AttributeModel {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_remove() {
        let mut model = AttributeModel::new();
        assert!(model.is_empty());

        model.set("enabled".to_string(), json!(true));
        model.set("max-pool-size".to_string(), json!(20));
        assert_eq!(model.len(), 2);
        assert_eq!(model.get("enabled"), Some(&json!(true)));
        assert!(model.contains("max-pool-size"));

        let removed = model.remove("enabled");
        assert_eq!(removed, Some(json!(true)));
        assert!(!model.contains("enabled"));
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut model = AttributeModel::new();
        model.set("zeta".to_string(), json!(1));
        model.set("alpha".to_string(), json!(2));
        let names: Vec<&String> = model.keys().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut model = AttributeModel::new();
        model.set("nested".to_string(), json!({"a": [1, 2, 3]}));

        let mut cloned = model.clone();
        cloned.set("nested".to_string(), json!(null));
        assert_eq!(model.get("nested"), Some(&json!({"a": [1, 2, 3]})));
    }
}
