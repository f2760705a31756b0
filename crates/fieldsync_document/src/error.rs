//! Error types for the document model.

use thiserror::Error;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while interpreting document values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A text value could not be parsed as WKT.
    #[error("invalid WKT point: {0}")]
    InvalidWkt(String),
}
