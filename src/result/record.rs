//! Read records and typed hydration

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Error)]
pub enum HydrateError {
    #[error("Record of '{entity}' has no field '{field}'")]
    MissingField { entity: String, field: String },
    #[error("Field '{field}' of '{entity}' is not {expected}: {value}")]
    InvalidType {
        entity: String,
        field: String,
        expected: &'static str,
        value: Value,
    },
}

/// One entity row, keyed by field name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub entity: String,
    pub values: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// A field that must be present, though it may be null
    pub fn require(&self, field: &str) -> Result<&Value, HydrateError> {
        self.get(field).ok_or_else(|| HydrateError::MissingField {
            entity: self.entity.clone(),
            field: field.to_string(),
        })
    }

    pub fn text(&self, field: &str) -> Result<String, HydrateError> {
        self.optional_text(field)?
            .ok_or_else(|| self.invalid(field, "text", Value::Null))
    }

    pub fn optional_text(&self, field: &str) -> Result<Option<String>, HydrateError> {
        match self.require(field)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            other => Err(self.invalid(field, "text", other.clone())),
        }
    }

    pub fn integer(&self, field: &str) -> Result<i64, HydrateError> {
        let value = self.require(field)?;
        value
            .as_i64()
            .ok_or_else(|| self.invalid(field, "an integer", value.clone()))
    }

    pub fn float(&self, field: &str) -> Result<Option<f64>, HydrateError> {
        match self.require(field)? {
            Value::Null => Ok(None),
            value => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.invalid(field, "a number", value.clone())),
        }
    }

    fn invalid(&self, field: &str, expected: &'static str, value: Value) -> HydrateError {
        HydrateError::InvalidType {
            entity: self.entity.clone(),
            field: field.to_string(),
            expected,
            value,
        }
    }
}

/// Types that can be built from a read record
pub trait Hydrate: Sized {
    fn hydrate(record: &Record) -> Result<Self, HydrateError>;
}

impl Hydrate for Record {
    fn hydrate(record: &Record) -> Result<Self, HydrateError> {
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Record {
        let mut record = Record::new("unit");
        record.insert("id", Value::Integer(3));
        record.insert("uuid", Value::from("u3"));
        record.insert("name", Value::Null);
        record
    }

    #[test]
    fn test_typed_accessors() {
        let record = unit();
        assert_eq!(record.integer("id").unwrap(), 3);
        assert_eq!(record.text("uuid").unwrap(), "u3");
        assert_eq!(record.optional_text("name").unwrap(), None);
    }

    #[test]
    fn test_accessor_errors() {
        let record = unit();
        assert!(matches!(record.text("missing"), Err(HydrateError::MissingField { .. })));
        assert!(matches!(record.text("name"), Err(HydrateError::InvalidType { .. })));
        assert!(matches!(record.integer("uuid"), Err(HydrateError::InvalidType { .. })));
    }
}
