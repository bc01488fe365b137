//! SQL emitter (verb module)
//!
//! Transforms a QueryPlan into a SQL string plus its bind parameters.

mod error;
mod sql;

pub use error::EmitError;
pub use sql::{emit_node, emit_sql, SqlQuery};
