//! Error types for the core entity model.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the local store layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The underlying repository failed.
    #[error("repository error: {0}")]
    Repository(String),

    /// No free identifier could be assigned to a new record.
    #[error("identifier space exhausted for {entity_type}")]
    IdSpaceExhausted {
        /// Entity type name.
        entity_type: &'static str,
    },
}

impl CoreError {
    /// Creates a repository error.
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::repository("row gone");
        assert_eq!(err.to_string(), "repository error: row gone");

        let err = CoreError::IdSpaceExhausted {
            entity_type: "roles",
        };
        assert!(err.to_string().contains("roles"));
    }
}
