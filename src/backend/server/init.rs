/**
 * Server Initialization
 *
 * This module wires configuration, storage and integrations into an
 * `AppState` and builds the Axum router around it.
 *
 * # Initialization Process
 *
 * 1. Open the database pool and run migrations
 * 2. Choose the image store (Cloudinary when configured, local disk otherwise)
 * 3. Build the Facebook client when credentials are present
 * 4. Start the periodic story purge
 * 5. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::backend::auth::oauth::FacebookClient;
use crate::backend::error::BackendError;
use crate::backend::media::{CloudinaryStore, ImageStore, LocalImageStore};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::stories;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated. The optional
/// integrations never fail startup: without them the affected routes answer
/// `503` or fall back to local storage.
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing Photogram backend server");

    let state = build_state(config).await?;
    spawn_story_purge(state.db_pool.clone(), state.config.story_purge_interval);

    let app = create_router(state);
    tracing::info!("Router configured with periodic story purge");

    Ok(app)
}

/// Build the shared state without starting background tasks
pub async fn build_state(config: ServerConfig) -> Result<AppState, BackendError> {
    let db_pool = load_database(&config.database_url).await?;

    let images: Arc<dyn ImageStore> = match &config.cloudinary {
        Some(cloudinary) => {
            tracing::info!("Using Cloudinary image store ({})", cloudinary.cloud_name);
            Arc::new(CloudinaryStore::new(cloudinary.clone()))
        }
        None => {
            tracing::info!("Using local image store at {}", config.upload_dir.display());
            Arc::new(LocalImageStore::new(config.upload_dir.clone()))
        }
    };

    let facebook = config
        .facebook
        .clone()
        .map(|fb| Arc::new(FacebookClient::new(fb)));

    Ok(AppState {
        db_pool,
        config: Arc::new(config),
        images,
        facebook,
    })
}

/// Periodically delete stories whose 24 hours are over
fn spawn_story_purge(pool: SqlitePool, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match stories::db::purge_expired(&pool, Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => tracing::info!("Purged {} expired stories", purged),
                Err(e) => tracing::error!("Failed to purge expired stories: {:?}", e),
            }
        }
    });
}
