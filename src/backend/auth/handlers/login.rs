/**
 * Login Handler
 *
 * `POST /users/login`
 *
 * # Authentication Process
 *
 * 1. Look up the user by email, or by username when no email is sent
 * 2. Verify the password with bcrypt
 * 3. Issue an access/refresh token pair and store the refresh token
 *
 * Unknown accounts, wrong passwords and Facebook-only accounts (no password)
 * all produce the same `401`.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{LoginRequest, TokenResponse};
use crate::backend::auth::sessions::authenticate;
use crate::backend::auth::users::get_user_by_login;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "User with email and password not found";

pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<(StatusCode, Json<TokenResponse>)> {
    let email = request.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());
    tracing::info!("Login request for: {}", email.or(username).unwrap_or("<none>"));

    let user = get_user_by_login(&app_state.db_pool, email, username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login for unknown account");
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    let password_hash = user.password_hash.as_deref().ok_or_else(|| {
        tracing::warn!("Password login attempted for Facebook account: {}", user.username);
        BackendError::unauthorized(INVALID_CREDENTIALS)
    })?;

    if !verify(&request.password, password_hash)? {
        tracing::warn!("Invalid password for user: {}", user.username);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    let tokens = authenticate(&app_state.db_pool, app_state.auth(), user.id).await?;

    tracing::info!("User logged in successfully: {}", user.username);
    Ok((StatusCode::CREATED, Json(TokenResponse { ok: true, tokens })))
}
