//! Types for resolved field paths

use crate::definition::{Association, DataType, EntityDefinition, Field};

/// One association hop of a field path
#[derive(Debug, Clone)]
pub struct JoinStep<'a> {
    pub association: &'a Association,
    /// Entity the hop starts from
    pub from_entity: &'a EntityDefinition,
    /// Entity the hop lands on
    pub to_entity: &'a EntityDefinition,
    /// Alias of the table the hop starts from
    pub from_alias: String,
    /// Alias of the joined table: `<from_alias>.<association>`
    pub alias: String,
}

impl JoinStep<'_> {
    pub fn is_to_many(&self) -> bool {
        self.association.is_to_many()
    }
}

/// A field path resolved against the schema
///
/// `product.categories.name` resolves to one join step (`product.categories`)
/// and the `name` field of `category`.
#[derive(Debug, Clone)]
pub struct ResolvedField<'a> {
    /// The path as written by the caller
    pub path: String,
    /// Association hops from the root, in join order
    pub steps: Vec<JoinStep<'a>>,
    /// Entity owning the field
    pub entity: &'a EntityDefinition,
    /// Alias of the table holding the field (root alias when no hops)
    pub alias: String,
    pub field: &'a Field,
    /// Accessor into a JSON field (`gross` for `price.gross`)
    pub json_path: Option<String>,
}

impl ResolvedField<'_> {
    /// Does any hop multiply root rows?
    pub fn is_to_many(&self) -> bool {
        self.steps.iter().any(JoinStep::is_to_many)
    }

    /// Aliases of all to-many hops
    pub fn to_many_aliases(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.is_to_many())
            .map(|s| s.alias.as_str())
            .collect()
    }

    pub fn data_type(&self) -> &DataType {
        &self.field.data_type
    }

    /// Type of the value read at this path; unknown inside a JSON document
    pub fn value_type(&self) -> Option<&DataType> {
        match self.json_path {
            Some(_) => None,
            None => Some(&self.field.data_type),
        }
    }

    /// Numeric fields and JSON accessors can feed avg/sum
    pub fn is_numeric(&self) -> bool {
        self.json_path.is_some() || self.field.data_type.is_numeric()
    }

    pub fn is_translated(&self) -> bool {
        self.field.translated
    }
}
