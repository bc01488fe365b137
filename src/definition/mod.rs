//! Entity definition types (nouns)
//!
//! These types represent the parsed entity schema: the metadata the layer
//! needs to turn field paths into tables, columns and joins.

mod association;
mod entity;
mod schema;
mod types;

pub use association::{Association, AssociationKind};
pub use entity::{EntityDefinition, Field};
pub use schema::Schema;
pub use types::{DataType, ParseDataTypeError};
