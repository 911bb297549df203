/**
 * Story Handlers
 *
 * `/stories` endpoints. A story is a single image that stays visible for 24
 * hours; expired stories are filtered out of reads and purged in the
 * background.
 */

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::media::{read_image, ROOT_FOLDER};
use crate::backend::middleware::{ApiPath, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::stories::db;
use crate::shared::social::StoryView;

/// `POST /stories`: multipart field `image`
pub async fn create_story(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> BackendResult<(StatusCode, Json<StoryView>)> {
    let me = auth_user.user();
    let file = read_image(&mut multipart, "image").await?;

    let id = Uuid::new_v4();
    let url = app_state
        .images
        .upload(file.into_upload(format!("{}/stories", ROOT_FOLDER), id.to_string()))
        .await?;

    let story = db::create_story(&app_state.db_pool, id, me.id, &url, Utc::now()).await?;
    tracing::info!("{} posted story {}", me.username, story.id);

    let view = db::load_view(&app_state.db_pool, story).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /stories`: active stories of the caller and the accounts they follow
pub async fn list_stories(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
) -> BackendResult<Json<Vec<StoryView>>> {
    let stories = db::list_active_feed(&app_state.db_pool, auth_user.user().id, Utc::now()).await?;
    Ok(Json(db::load_views(&app_state.db_pool, stories).await?))
}

pub async fn delete_story(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<&'static str> {
    let story = db::get_story(&app_state.db_pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Story not found"))?;
    if story.user_id != auth_user.user().id {
        return Err(BackendError::unauthorized("User not Authorized"));
    }

    db::delete_story(&app_state.db_pool, story.id).await?;
    Ok("DELETED")
}
