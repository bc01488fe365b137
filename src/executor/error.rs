//! Executor errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A column the caller expected is missing from the result
    #[error("Result has no column '{0}'")]
    MissingColumn(String),
}
