//! Error types for model ingestion.
//!
//! Ingestion is the only fallible stage: once a [`crate::model::DataModel`]
//! exists, generation always produces a document, falling back to permissive
//! expressions instead of failing (unmappable scalars, unknown enums,
//! malformed overrides).

use thiserror::Error;

/// Result type alias for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error raised while ingesting a raw model document.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The raw document is absent or structurally malformed.
    #[error("malformed model document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document parsed but declares no entities to generate for.
    #[error("model document declares no entities")]
    NoEntities,
}
