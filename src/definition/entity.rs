//! Entity and field definitions

use convert_case::{Case, Casing};
use serde::Deserialize;

use super::association::Association;
use super::types::DataType;

fn default_primary_key() -> String {
    "uuid".to_string()
}

/// A persisted entity: one root table plus its fields and associations
#[derive(Debug, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    /// Physical table name (defaults to the entity name)
    pub table: Option<String>,
    /// Primary key column
    #[serde(rename = "primaryKey", default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub associations: Vec<Association>,
}

impl EntityDefinition {
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    /// Name of the translation table: `<table>_translation`
    pub fn translation_table(&self) -> String {
        format!("{}_translation", self.table_name())
    }

    /// Column on the translation table pointing back at this entity: `<entity>_<pk>`
    pub fn translation_foreign_key(&self) -> String {
        format!("{}_{}", self.name, self.primary_key)
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_association(&self, name: &str) -> Option<&Association> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// The field stored in the primary key column, if one is declared
    pub fn primary_key_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.column_name() == self.primary_key)
    }

    /// Field an association path resolves to when it ends without a field:
    /// `id` if declared, otherwise the primary key field.
    pub fn identifier_field(&self) -> Option<&Field> {
        self.get_field("id").or_else(|| self.primary_key_field())
    }

    pub fn has_translations(&self) -> bool {
        self.fields.iter().any(|f| f.translated)
    }
}

/// A scalar field of an entity
#[derive(Debug, Deserialize)]
pub struct Field {
    /// Property name used in field paths (e.g. `taxRate`)
    pub name: String,
    /// Storage column (defaults to the snake_case property name)
    pub column: Option<String>,
    #[serde(rename = "type", default)]
    pub data_type: DataType,
    /// Stored on the `<table>_translation` table instead of the root table
    #[serde(default)]
    pub translated: bool,
}

impl Field {
    pub fn column_name(&self) -> String {
        self.column
            .clone()
            .unwrap_or_else(|| self.name.to_case(Case::Snake))
    }
}
