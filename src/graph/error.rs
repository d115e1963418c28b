//! Errors raised by graph document import/export.

use thiserror::Error;

/// Failure to read or write a `{ "nodes": [...], "edges": [...] }` document.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The text is not valid JSON, or serialization failed.
    #[error("failed to parse graph document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but does not have the expected shape.
    #[error("invalid graph document: `{field}` must be an array")]
    InvalidDocument { field: &'static str },
}
