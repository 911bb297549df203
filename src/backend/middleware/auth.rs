/**
 * Authentication Middleware
 *
 * This module protects routes that require a signed-in user. The middleware
 * extracts and verifies the access token from the `Authorization` header,
 * loads the user, and stores it in the request extensions where the
 * `AuthUser` extractor picks it up.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::{get_user_by_id, User};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// The signed-in user, loaded from the database for this request
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    /// The raw access token the request was made with
    pub token: String,
}

/// Read the bearer token from a request's headers
pub fn bearer_token(parts: &axum::http::HeaderMap) -> Option<&str> {
    parts
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// 1. Extracts the token from `Authorization: Bearer <token>`
/// 2. Verifies it as an access token
/// 3. Loads the user it was issued to
/// 4. Attaches the user to the request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid, or the user
/// no longer exists.
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            BackendError::unauthorized("Please log in")
        })?
        .to_string();

    let user_id = verify_token(app_state.auth(), &token).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::unauthorized("Please log in")
    })?;

    let user = get_user_by_id(&app_state.db_pool, user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token belongs to a deleted user: {}", user_id);
            BackendError::unauthorized("Please log in")
        })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user, token });

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind `require_auth`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl AuthUser {
    pub fn user(&self) -> &User {
        &self.0.user
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Please log in")
            })?;

        Ok(AuthUser(user))
    }
}
