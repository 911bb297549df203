/**
 * Facebook Login Handlers
 *
 * - `GET /users/facebookLogin` redirects to the Facebook login dialog
 * - `GET /users/facebookRedirect` completes the code flow, finds or creates
 *   the local account and redirects to the frontend with a token pair
 *
 * The `state` parameter is a short-lived signed token, so no server-side
 * session is needed to check it on the way back.
 */

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use sqlx::SqlitePool;

use crate::backend::auth::handlers::types::FacebookCallback;
use crate::backend::auth::oauth::{FacebookClient, FacebookProfile};
use crate::backend::auth::sessions::{authenticate, create_state_token, verify_state_token};
use crate::backend::auth::users::{
    create_user, get_user_by_email, get_user_by_facebook_id, username_exists, NewUser, User,
};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::social::DEFAULT_AVATAR;

const MAX_USERNAME_CHARS: usize = 30;

fn facebook_client(app_state: &AppState) -> BackendResult<&FacebookClient> {
    app_state.facebook.as_deref().ok_or_else(|| {
        tracing::warn!("Facebook login requested but not configured");
        BackendError::unavailable("Facebook login is not configured")
    })
}

pub async fn facebook_login(State(app_state): State<AppState>) -> BackendResult<Redirect> {
    let client = facebook_client(&app_state)?;
    let state = create_state_token(app_state.auth())?;
    let url = client.authorization_url(&state)?;
    Ok(Redirect::to(&url))
}

pub async fn facebook_redirect(
    State(app_state): State<AppState>,
    Query(callback): Query<FacebookCallback>,
) -> BackendResult<Redirect> {
    let client = facebook_client(&app_state)?;

    if let Some(error) = &callback.error {
        tracing::info!("Facebook login declined: {}", error);
        return Err(BackendError::unauthorized("Facebook login was cancelled"));
    }

    let state = callback
        .state
        .as_deref()
        .ok_or_else(|| BackendError::bad_request("Missing OAuth state"))?;
    verify_state_token(app_state.auth(), state).map_err(|e| {
        tracing::warn!("Rejected OAuth state: {}", e);
        BackendError::bad_request("Invalid OAuth state")
    })?;

    let code = callback
        .code
        .as_deref()
        .ok_or_else(|| BackendError::bad_request("Missing authorization code"))?;

    let access_token = client.exchange_code(code).await?;
    let profile = client.fetch_profile(&access_token).await?;

    let user = find_or_create_user(&app_state.db_pool, profile).await?;
    let tokens = authenticate(&app_state.db_pool, app_state.auth(), user.id).await?;

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("token", &tokens.token)
        .append_pair("refreshToken", &tokens.refresh_token)
        .finish();
    Ok(Redirect::to(&format!(
        "{}/profile?{}",
        app_state.frontend_url(),
        query
    )))
}

/// Return the account linked to this Facebook id, creating it on first login
pub async fn find_or_create_user(pool: &SqlitePool, profile: FacebookProfile) -> BackendResult<User> {
    if let Some(user) = get_user_by_facebook_id(pool, &profile.id).await? {
        return Ok(user);
    }

    let display_name = profile
        .name
        .clone()
        .or_else(|| profile.first_name.clone())
        .unwrap_or_default();
    let username = unique_username(pool, &display_name).await?;

    let email = match profile.email.as_deref().map(str::to_lowercase) {
        Some(email) if get_user_by_email(pool, &email).await?.is_none() => email,
        _ => placeholder_email(&profile.id),
    };

    let user = create_user(
        pool,
        NewUser {
            username,
            email,
            password_hash: None,
            name: profile.first_name,
            surname: profile.last_name,
            gender: profile.gender,
            img: DEFAULT_AVATAR.to_string(),
            private: false,
            facebook_id: Some(profile.id),
        },
    )
    .await?;

    tracing::info!("Created account {} from Facebook login", user.username);
    Ok(user)
}

fn placeholder_email(facebook_id: &str) -> String {
    format!("{}@facebook.invalid", facebook_id)
}

/// Turn a display name into a valid username
fn username_base(display_name: &str) -> String {
    let base: String = display_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        .take(MAX_USERNAME_CHARS)
        .collect();
    if base.chars().count() < 3 {
        format!("user{}", base)
    } else {
        base
    }
}

/// Append the smallest numeric suffix that makes the name free
async fn unique_username(pool: &SqlitePool, display_name: &str) -> BackendResult<String> {
    let base = username_base(display_name);
    if !username_exists(pool, &base).await? {
        return Ok(base);
    }

    let mut suffix: u32 = 1;
    loop {
        let suffix_str = suffix.to_string();
        let keep = MAX_USERNAME_CHARS - suffix_str.len();
        let candidate: String = base.chars().take(keep).chain(suffix_str.chars()).collect();
        if !username_exists(pool, &candidate).await? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}
