//! Error types for the dashboard core.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Comprehensive error type for all dashboard operations.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A required field was empty or a value was outside its allowed set
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// The referenced document does not exist
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: &'static str, id: String },
    /// Underlying document store failure
    #[error("Store error: {message}")]
    Store {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A conditional write lost against a concurrent writer
    #[error("Concurrent modification of {kind} {id}")]
    Conflict { kind: &'static str, id: String },
    /// The access-control collaborator refused the action
    #[error("Actor {actor} is not allowed to {action}")]
    PermissionDenied { actor: String, action: &'static str },
    /// An external call did not finish in time
    #[error("Operation '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    /// The caller cancelled the operation
    #[error("Operation '{operation}' was cancelled")]
    Cancelled { operation: &'static str },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Document (de)serialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration and runtime plumbing errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating store errors with context.
pub struct StoreErrorBuilder {
    message: String,
}

impl StoreErrorBuilder {
    /// Create a new store error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> DashboardError {
        DashboardError::Store {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct ValidationBuilder {
    field: String,
}

impl ValidationBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> DashboardError {
        DashboardError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl DashboardError {
    /// Creates a builder for store errors.
    pub fn store(message: impl Into<String>) -> StoreErrorBuilder {
        StoreErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationBuilder {
        ValidationBuilder::new(field)
    }

    /// Shorthand for a missing document of the given kind.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns true for the `NotFound` kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for the `Validation` kind.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Specialized extension trait for store-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| DashboardError::store(message).with_source(e))
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Rejects blank strings for required fields.
pub(crate) fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DashboardError::validation(field).with_reason("must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_builder() {
        let err = DashboardError::validation("title").with_reason("must not be empty");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'title': must not be empty"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = DashboardError::not_found("Topic", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Topic with ID abc not found");
    }

    #[test]
    fn test_require_non_blank() {
        assert!(require_non_blank("title", "Auth").is_ok());
        assert!(require_non_blank("title", "   ").is_err());
        assert!(require_non_blank("title", "").is_err());
    }
}
