/**
 * Token Handlers
 *
 * - `POST /users/refreshToken` exchanges a stored refresh token for a new pair
 * - `POST /users/logOut` revokes the refresh token sent in the body
 * - `POST /users/logOutAll` revokes every refresh token of the caller
 *
 * Both logout routes answer with a `303` redirect to the frontend login page.
 */

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Json, Redirect},
};

use crate::backend::auth::handlers::types::{RefreshRequest, TokenResponse};
use crate::backend::auth::sessions::rotate_refresh_token;
use crate::backend::auth::users::{clear_refresh_tokens, remove_refresh_token};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Read `{refreshToken}` from a body that may be empty or not JSON at all
fn refresh_token_from(body: &Bytes) -> Option<String> {
    serde_json::from_slice::<RefreshRequest>(body)
        .ok()
        .and_then(|r| r.refresh_token)
        .filter(|t| !t.trim().is_empty())
}

fn login_page(app_state: &AppState) -> Redirect {
    Redirect::to(&format!("{}/logIn", app_state.frontend_url()))
}

pub async fn refresh_token(
    State(app_state): State<AppState>,
    body: Bytes,
) -> BackendResult<(StatusCode, Json<TokenResponse>)> {
    let old = refresh_token_from(&body)
        .ok_or_else(|| BackendError::bad_request("Refresh token missing"))?;

    let tokens = rotate_refresh_token(&app_state.db_pool, app_state.auth(), &old)
        .await?
        .ok_or_else(|| BackendError::forbidden("Invalid refresh token"))?;

    Ok((StatusCode::CREATED, Json(TokenResponse { ok: true, tokens })))
}

pub async fn log_out(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    body: Bytes,
) -> BackendResult<Redirect> {
    let token = refresh_token_from(&body)
        .ok_or_else(|| BackendError::unauthorized("Token not provided"))?;

    let user = auth_user.user();
    if !remove_refresh_token(&app_state.db_pool, user.id, &token).await? {
        tracing::debug!("Logout with a refresh token that was not stored: {}", user.username);
    }

    tracing::info!("User logged out: {}", user.username);
    Ok(login_page(&app_state))
}

pub async fn log_out_all(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
) -> BackendResult<Redirect> {
    let user = auth_user.user();
    let revoked = clear_refresh_tokens(&app_state.db_pool, user.id).await?;

    tracing::info!("User {} logged out of {} sessions", user.username, revoked);
    Ok(login_page(&app_state))
}
