use serde::{Serialize, Serializer};

use crate::value::Value;

/// Values of the group-by fields of one result row, in group-by order
///
/// `GroupKey::from([("categories.name", "cat1")])`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupKey(Vec<(String, Value)>);

impl GroupKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.push((field.into(), value.into()));
    }

    /// Value of a group-by field path
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.iter().find(|(f, _)| f == field).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for GroupKey {
    fn from(pairs: [(K, V); N]) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(f, v)| (f, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_key_lookup_and_order() {
        let key = GroupKey::from([("categories.name", "cat1"), ("manufacturer.id", "m1")]);
        assert_eq!(key.get("manufacturer.id"), Some(&Value::from("m1")));
        assert_eq!(key.get("missing"), None);
        let fields: Vec<&str> = key.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["categories.name", "manufacturer.id"]);
    }

    #[test]
    fn test_group_key_serializes_as_map() {
        let key = GroupKey::from([("active", Value::Bool(true))]);
        assert_eq!(serde_json::to_string(&key).unwrap(), r#"{"active":true}"#);
    }
}
