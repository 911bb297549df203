/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Raised directly by handlers with an explicit status: a missing user (404),
 * an action on someone else's comment (401), a bad follow request (400).
 *
 * ## Store Errors
 *
 * Wrapped `sqlx` errors. Unique-constraint violations become `400` because they
 * are caused by client input (a taken username or email); everything else is
 * a `500` whose details are logged but not sent to the client.
 *
 * ## Integration Errors
 *
 * Failures of the delegated services: password hashing, token signing,
 * image uploads, the Facebook Graph API.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::oauth::OAuthError;
use crate::backend::media::UploadError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use photogram::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("User not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or verification failed
    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    /// Token could not be signed or did not verify
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Image upload failed
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Facebook login failed
    #[error(transparent)]
    OAuth(#[from] OAuthError),

    /// Shared error (validation, serialization)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    /// - `HandlerError` - Uses the status code from the error
    /// - `Database` - 400 on unique violations, 404 on `RowNotFound`, else 500
    /// - `Token` - 401
    /// - `Upload` - 400 for rejected files, 502 when the store fails
    /// - `OAuth` - 502
    /// - `SharedError` - 400 for validation, 500 for serialization
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Database(err) => {
                if is_unique_violation(err) {
                    StatusCode::BAD_REQUEST
                } else if matches!(err, sqlx::Error::RowNotFound) {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
            Self::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::Upload(err) => err.status_code(),
            Self::OAuth(_) => StatusCode::BAD_GATEWAY,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message sent to the client
    ///
    /// Internal failures are reported generically; their details only go to
    /// the log.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Database(err) if is_unique_violation(err) => {
                "Username or email already in use".to_string()
            }
            Self::Database(sqlx::Error::RowNotFound) => "Not found".to_string(),
            Self::Token(_) => "Invalid or expired token".to_string(),
            Self::Upload(err) if err.status_code().is_client_error() => err.to_string(),
            Self::Upload(_) => "Image upload failed".to_string(),
            Self::OAuth(_) => "Facebook login failed".to_string(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
