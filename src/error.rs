//! Error types for shopdal

use thiserror::Error;

use crate::emitter::EmitError;
use crate::executor::ExecuteError;
use crate::planner::PlanError;
use crate::resolver::ResolveError;
use crate::result::HydrateError;

/// Errors that can occur during schema parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// IO error reading file
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// YAML deserialization error
    #[error("Invalid YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
    /// Schema is structurally valid YAML but inconsistent
    #[error("Invalid schema: {0}")]
    Invalid(String),
}

/// Top-level error returned by repository operations
#[derive(Debug, Error)]
pub enum DalError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
    #[error(transparent)]
    Hydrate(#[from] HydrateError),
}
