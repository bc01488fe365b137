//! Emitter errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    /// Plan has no table scan to select from
    #[error("Invalid plan: no table scan to select from")]
    MissingFrom,
    /// Invalid plan structure
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}
