//! Data type definitions for entity fields

use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

use crate::value::Value;

/// Storage types an entity field can have
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataType {
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 32-bit floating point
    F32,
    /// 64-bit floating point
    F64,
    /// Boolean
    Bool,
    /// Variable-length string
    #[default]
    String,
    /// Date (days since Unix epoch)
    Date,
    /// Timestamp (microseconds since Unix epoch)
    Timestamp,
    /// Fixed-point decimal with precision and scale
    Decimal { precision: u8, scale: u8 },
    /// JSON document; nested keys are addressed with further path segments
    Json,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::I8 => write!(f, "i8"),
            DataType::I16 => write!(f, "i16"),
            DataType::I32 => write!(f, "i32"),
            DataType::I64 => write!(f, "i64"),
            DataType::F32 => write!(f, "f32"),
            DataType::F64 => write!(f, "f64"),
            DataType::Bool => write!(f, "bool"),
            DataType::String => write!(f, "string"),
            DataType::Date => write!(f, "date"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Decimal { precision, scale } => write!(f, "decimal({}, {})", precision, scale),
            DataType::Json => write!(f, "json"),
        }
    }
}

/// Error when parsing a data type string
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid data type '{input}': {message}")]
pub struct ParseDataTypeError {
    pub input: String,
    pub message: String,
}

impl FromStr for DataType {
    type Err = ParseDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();

        if lower.starts_with("decimal(") && lower.ends_with(')') {
            return parse_decimal(&lower);
        }

        match lower.as_str() {
            "i8" => Ok(DataType::I8),
            "i16" => Ok(DataType::I16),
            "i32" | "int" | "integer" => Ok(DataType::I32),
            "i64" | "long" | "bigint" => Ok(DataType::I64),
            "f32" | "float" => Ok(DataType::F32),
            "f64" | "double" => Ok(DataType::F64),
            "bool" | "boolean" => Ok(DataType::Bool),
            "string" | "text" | "varchar" | "uuid" => Ok(DataType::String),
            "date" => Ok(DataType::Date),
            "timestamp" | "datetime" => Ok(DataType::Timestamp),
            "json" => Ok(DataType::Json),
            _ => Err(ParseDataTypeError {
                input: s.to_string(),
                message: "unknown type".to_string(),
            }),
        }
    }
}

fn parse_decimal(s: &str) -> Result<DataType, ParseDataTypeError> {
    // "decimal(10, 2)" -> "10, 2"
    let inner = &s[8..s.len() - 1];
    let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();

    if parts.len() != 2 {
        return Err(ParseDataTypeError {
            input: s.to_string(),
            message: "decimal requires precision and scale, e.g., decimal(10, 2)".to_string(),
        });
    }

    let precision: u8 = parts[0].parse().map_err(|_| ParseDataTypeError {
        input: s.to_string(),
        message: "invalid precision".to_string(),
    })?;

    let scale: u8 = parts[1].parse().map_err(|_| ParseDataTypeError {
        input: s.to_string(),
        message: "invalid scale".to_string(),
    })?;

    if precision == 0 || precision > 38 {
        return Err(ParseDataTypeError {
            input: s.to_string(),
            message: "precision must be between 1 and 38".to_string(),
        });
    }

    if scale > precision {
        return Err(ParseDataTypeError {
            input: s.to_string(),
            message: "scale cannot exceed precision".to_string(),
        });
    }

    Ok(DataType::Decimal { precision, scale })
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DataType::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl DataType {
    /// Map a value read from the store onto this type
    ///
    /// SQLite has no boolean storage class, so bool columns come back as 0/1.
    pub fn normalize(&self, value: Value) -> Value {
        match (self, value) {
            (DataType::Bool, Value::Integer(i)) => Value::Bool(i != 0),
            (_, value) => value,
        }
    }

    /// Check if this is a numeric type (integer, floating point or decimal)
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::I8
                | DataType::I16
                | DataType::I32
                | DataType::I64
                | DataType::F32
                | DataType::F64
                | DataType::Decimal { .. }
        )
    }

    pub fn is_json(&self) -> bool {
        matches!(self, DataType::Json)
    }
}
