/**
 * Registration Handler
 *
 * `POST /users/register`
 *
 * # Process
 *
 * 1. Validate username, email and password
 * 2. Hash the password with bcrypt
 * 3. Insert the user with the default avatar
 * 4. Return the new id
 *
 * Username and email are unique (case-insensitive). A duplicate hits the
 * unique index and surfaces as `400`.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::hash;

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::users::{create_user, NewUser};
use crate::backend::error::BackendResult;
use crate::backend::server::state::AppState;
use crate::shared::social::user::{validate_email, validate_password, validate_username};
use crate::shared::social::DEFAULT_AVATAR;

pub async fn register(
    State(app_state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> BackendResult<(StatusCode, Json<RegisterResponse>)> {
    let username = request.username.trim().to_string();
    let email = request.email.trim().to_lowercase();
    tracing::info!("Register request for: {}", username);

    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&request.password)?;

    let password_hash = hash(&request.password, app_state.auth().password_cost)?;

    let user = create_user(
        &app_state.db_pool,
        NewUser {
            username,
            email,
            password_hash: Some(password_hash),
            name: request.name,
            surname: request.surname,
            gender: request.gender,
            img: DEFAULT_AVATAR.to_string(),
            private: false,
            facebook_id: None,
        },
    )
    .await
    .map_err(|e| {
        tracing::warn!("Failed to create user: {}", e);
        e
    })?;

    tracing::info!("User registered: {} ({})", user.username, user.id);
    Ok((StatusCode::CREATED, Json(RegisterResponse { id: user.id })))
}
