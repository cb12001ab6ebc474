//! Error types for the schema engine.

use thiserror::Error;
use trellis_types::ContentId;

/// Result type for schema engine operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors surfaced by schema declaration, rendering, membership checks,
/// alias delegation and persistence.
///
/// All variants are recoverable at the call site.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A field or behavior name collides with an existing behavior or field.
    #[error("name '{name}' on type '{type_name}' conflicts with an existing behavior")]
    NameConflict { type_name: String, name: String },

    /// A membership rule references a style the type does not declare.
    #[error("unknown style '{style}' for type '{type_name}'")]
    UnknownStyle { style: String, type_name: String },

    /// Absent at every level of the resolution chain.
    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },

    /// Optimistic version mismatch on persistence.
    #[error("version conflict on {id}: expected {expected}, found {actual}")]
    Conflict {
        id: ContentId,
        expected: u64,
        actual: u64,
    },

    /// Delegation attempted on an alias with no live target.
    #[error("alias {0} has no live target")]
    OrphanedAlias(ContentId),

    #[error("invalid alias target: {0}")]
    InvalidAliasTarget(String),

    #[error("content type already defined: {0}")]
    DuplicateType(String),

    #[error("unknown field kind: {0}")]
    UnknownFieldKind(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Types(#[from] trellis_types::Error),
}

impl ModelError {
    pub(crate) fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }
}
