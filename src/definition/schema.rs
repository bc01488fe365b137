//! Root schema definition

use serde::Deserialize;
use std::path::Path;

use super::entity::EntityDefinition;
use crate::error::ParseError;

/// The root schema: every entity the layer can query
#[derive(Debug, Deserialize)]
pub struct Schema {
    pub entities: Vec<EntityDefinition>,
}

impl Schema {
    /// Load a schema from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        crate::parser::parse_file(path)
    }

    /// Get an entity definition by name
    pub fn get_entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Check cross-entity references.
    ///
    /// Entity names must be unique, every association must point at a declared
    /// entity, and every entity must declare the field stored in its primary key column.
    pub fn validate(&self) -> Result<(), ParseError> {
        for (idx, entity) in self.entities.iter().enumerate() {
            if self.entities[..idx].iter().any(|e| e.name == entity.name) {
                return Err(ParseError::Invalid(format!(
                    "entity '{}' is declared more than once",
                    entity.name
                )));
            }
            for association in &entity.associations {
                if self.get_entity(&association.reference).is_none() {
                    return Err(ParseError::Invalid(format!(
                        "association '{}.{}' references unknown entity '{}'",
                        entity.name, association.name, association.reference
                    )));
                }
            }
            if entity.primary_key_field().is_none() {
                return Err(ParseError::Invalid(format!(
                    "entity '{}' has no field stored in its primary key column '{}'",
                    entity.name, entity.primary_key
                )));
            }
        }
        Ok(())
    }
}
