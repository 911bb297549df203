/**
 * Application State Management
 *
 * `AppState` is the single state value shared by all handlers. It is cheap to
 * clone: the pool is reference counted internally and everything else sits
 * behind an `Arc`.
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract only what they need,
 * e.g. `State(pool): State<SqlitePool>`, following Axum's recommended pattern.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::oauth::FacebookClient;
use crate::backend::media::ImageStore;
use crate::backend::server::config::{AuthConfig, ServerConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<ServerConfig>,
    pub images: Arc<dyn ImageStore>,
    /// Present only when Facebook credentials are configured
    pub facebook: Option<Arc<FacebookClient>>,
}

impl AppState {
    pub fn auth(&self) -> &AuthConfig {
        &self.config.auth
    }

    pub fn frontend_url(&self) -> &str {
        self.config.frontend_url.trim_end_matches('/')
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ImageStore> {
    fn from_ref(state: &AppState) -> Self {
        state.images.clone()
    }
}
