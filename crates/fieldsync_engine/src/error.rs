//! Error types for the sync engine.

use fieldsync_core::CoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during sync operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No handler is registered for one or more requested entity types.
    /// Rejected before any work starts.
    #[error("no sync handler registered for: {}", types.join(", "))]
    UnknownTypes {
        /// The offending type names.
        types: Vec<String>,
    },

    /// A required foreign key was absent on an incoming document.
    #[error("{relation} id is required for {entity_type} but was absent")]
    RelationMissing {
        /// Entity type being upserted.
        entity_type: &'static str,
        /// Name of the missing relation.
        relation: &'static str,
    },

    /// A foreign key referred to an id with no local counterpart.
    #[error(
        "{relation} with id {id} not found for {entity_type}; \
         synchronize the {relation} type first"
    )]
    RelationNotFound {
        /// Entity type being upserted.
        entity_type: &'static str,
        /// Name of the dangling relation.
        relation: &'static str,
        /// The id that could not be resolved.
        id: i64,
    },

    /// The remote store call itself failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A stored media reference resolved outside the storage root.
    #[error("media path escapes storage root: {0}")]
    MediaPathEscape(String),

    /// Media storage could not be initialized or accessed.
    #[error("media storage error: {0}")]
    Media(String),

    /// Local store error during sync.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EngineError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a media storage error.
    pub fn media(message: impl Into<String>) -> Self {
        Self::Media(message.into())
    }

    /// Returns true for relation-integrity errors, which abort a single
    /// record on pull rather than the whole run.
    pub fn is_relation_integrity(&self) -> bool {
        matches!(
            self,
            EngineError::RelationMissing { .. } | EngineError::RelationNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_error_names_type_and_id() {
        let err = EngineError::RelationNotFound {
            entity_type: "users",
            relation: "role",
            id: 5,
        };
        let message = err.to_string();
        assert!(message.contains("role"));
        assert!(message.contains("5"));
        assert!(message.contains("users"));
        assert!(err.is_relation_integrity());
    }

    #[test]
    fn unknown_types_lists_all_offenders() {
        let err = EngineError::UnknownTypes {
            types: vec!["ghosts".into(), "specters".into()],
        };
        let message = err.to_string();
        assert!(message.contains("ghosts"));
        assert!(message.contains("specters"));
    }
}
