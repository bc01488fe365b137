//! Schema parser (verb module)
//!
//! Transforms YAML files into entity definitions.

use std::path::Path;

use crate::definition::Schema;
use crate::error::ParseError;

/// Parse a schema from a YAML file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Schema, ParseError> {
    let path_str = path.as_ref().display().to_string();
    let contents = std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
        path: path_str,
        source: e,
    })?;
    parse_str(&contents)
}

/// Parse a schema from a YAML string
pub fn parse_str(yaml: &str) -> Result<Schema, ParseError> {
    let schema: Schema = serde_yaml::from_str(yaml)?;
    schema.validate()?;
    log::debug!("parsed schema with {} entities", schema.entities.len());
    Ok(schema)
}
