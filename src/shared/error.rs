//! Shared Error Types
//!
//! Errors that describe bad input independently of the transport. The backend
//! wraps these in `BackendError`, which renders them as `400 Bad Request`.
//!
//! # Usage
//!
//! ```rust
//! use photogram::shared::error::SharedError;
//!
//! let error = SharedError::validation("username", "Username is required");
//! assert!(error.to_string().contains("username"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both frontend and backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
