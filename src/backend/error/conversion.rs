/**
 * Error Conversion
 *
 * `BackendError` implements `IntoResponse`, so handlers can return
 * `Result<_, BackendError>` and use `?` on every fallible call.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "User not found",
 *   "status": 404
 * }
 * ```
 */

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("Request failed with {}: {:?}", status, self);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

/// Malformed path parameters, e.g. an id that is not a UUID
impl From<PathRejection> for BackendError {
    fn from(rejection: PathRejection) -> Self {
        BackendError::handler(rejection.status(), rejection.body_text())
    }
}

/// Fallback for unknown routes
pub async fn not_found_fallback() -> BackendError {
    BackendError::handler(StatusCode::NOT_FOUND, "Route not found")
}
