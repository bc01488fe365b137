//! Associations between entities

use serde::Deserialize;

/// A named relation from one entity to another
#[derive(Debug, Deserialize)]
pub struct Association {
    pub name: String,
    /// Name of the referenced entity
    pub reference: String,
    #[serde(flatten)]
    pub kind: AssociationKind,
}

/// How the referenced rows are reached
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssociationKind {
    /// Local column holds the referenced primary key
    ManyToOne {
        #[serde(rename = "localColumn")]
        local_column: String,
    },
    /// Referenced table holds a column pointing at our primary key
    OneToMany {
        #[serde(rename = "foreignKey")]
        foreign_key: String,
    },
    /// Rows are linked through a mapping table
    ManyToMany {
        mapping: String,
        /// Mapping column holding our primary key
        #[serde(rename = "localColumn")]
        local_column: String,
        /// Mapping column holding the referenced primary key
        #[serde(rename = "referenceColumn")]
        reference_column: String,
    },
}

impl Association {
    /// Does following this association multiply root rows?
    pub fn is_to_many(&self) -> bool {
        !matches!(self.kind, AssociationKind::ManyToOne { .. })
    }
}
