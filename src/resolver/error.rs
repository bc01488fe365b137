use thiserror::Error;

/// Errors that can occur while resolving field paths
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Entity '{0}' not found")]
    EntityNotFound(String),
    #[error("Field '{field}' not found in entity '{entity}'")]
    FieldNotFound { entity: String, field: String },
    #[error("Association '{association}' of entity '{entity}' references unknown entity '{reference}'")]
    UnknownReference {
        entity: String,
        association: String,
        reference: String,
    },
    #[error("Field path '{path}' continues past scalar field '{field}'")]
    NotTraversable { path: String, field: String },
    #[error("Invalid JSON accessor '{accessor}' in field path '{path}'")]
    InvalidJsonPath { path: String, accessor: String },
    #[error("Entity '{0}' has no identifier field")]
    MissingIdentifier(String),
    #[error("Empty field path")]
    EmptyPath,
}
