//! Fixtures for unit tests that call handlers directly

use crate::backend::auth::users::{create_user, NewUser, User};
use crate::backend::server::config::{AuthConfig, ServerConfig};
use crate::backend::server::init::build_state;
use crate::backend::server::state::AppState;
use crate::shared::social::DEFAULT_AVATAR;

/// Fresh in-memory state with a cheap bcrypt cost
///
/// The returned `TempDir` owns the upload directory and must outlive the state.
pub async fn test_state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::builder()
        .database_url("sqlite::memory:")
        .frontend_url("http://front.test")
        .upload_dir(dir.path())
        .auth(AuthConfig {
            password_cost: 4,
            ..AuthConfig::default()
        })
        .build();
    let state = build_state(config).await.unwrap();
    (state, dir)
}

/// Insert a user whose password is `password123`
pub async fn insert_user(state: &AppState, username: &str, private: bool) -> User {
    let hash = bcrypt::hash("password123", 4).unwrap();
    create_user(
        &state.db_pool,
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: Some(hash),
            name: None,
            surname: None,
            gender: None,
            img: DEFAULT_AVATAR.to_string(),
            private,
            facebook_id: None,
        },
    )
    .await
    .unwrap()
}
