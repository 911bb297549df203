/**
 * Router Configuration
 *
 * Assembles the per-resource routers into the application router and adds
 * the shared layers.
 *
 * # Layers
 *
 * 1. `TraceLayer` - a span per request
 * 2. `CorsLayer` - the frontend is served from a different origin
 * 3. `DefaultBodyLimit` - raised so image uploads fit
 *
 * Locally stored uploads are served under `/static/uploads`. Unknown routes
 * get a JSON `404`.
 */

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::error::conversion::not_found_fallback;
use crate::backend::media::local::LOCAL_URL_PREFIX;
use crate::backend::media::MAX_IMAGE_BYTES;
use crate::backend::routes::api_routes::{
    comment_routes, notification_routes, post_routes, story_routes, user_routes,
};
use crate::backend::server::state::AppState;

/// Room for the multipart framing around a maximum-size image
const BODY_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let uploads = ServeDir::new(app_state.config.upload_dir.clone());

    Router::new()
        .merge(user_routes(app_state.clone()))
        .merge(post_routes(app_state.clone()))
        .merge(comment_routes(app_state.clone()))
        .merge(notification_routes(app_state.clone()))
        .merge(story_routes(app_state.clone()))
        .nest_service(LOCAL_URL_PREFIX, uploads)
        .fallback(not_found_fallback)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
