//! Query execution (verb module)
//!
//! Runs emitted SQL against a store and returns plain rows.

mod error;
mod rows;
mod sqlite;

pub use error::ExecuteError;
pub use rows::{Row, RowSet};
pub use sqlite::SqliteConnection;

use crate::emitter::SqlQuery;

/// A store that can answer emitted queries
pub trait Connection {
    fn fetch(&self, query: &SqlQuery) -> Result<RowSet, ExecuteError>;
}
