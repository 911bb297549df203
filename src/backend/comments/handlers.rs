/**
 * Comment Handlers
 *
 * `/comments` endpoints. Comments are addressed by the post they belong to
 * when created or listed, and by their own id otherwise.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::comments::db;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiPath, AuthUser};
use crate::backend::notifications::db::notify;
use crate::backend::posts::db as posts;
use crate::backend::posts::handlers::visible_post;
use crate::backend::server::state::AppState;
use crate::shared::social::comment::MAX_COMMENT_CHARS;
use crate::shared::social::{CommentList, CommentView, NotificationAction, PostView};
use crate::shared::SharedError;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

fn validate_text(text: &str) -> Result<String, SharedError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SharedError::validation("text", "Comment cannot be empty"));
    }
    if text.chars().count() > MAX_COMMENT_CHARS {
        return Err(SharedError::validation(
            "text",
            format!("Comment cannot exceed {} characters", MAX_COMMENT_CHARS),
        ));
    }
    Ok(text.to_string())
}

async fn find_comment(app_state: &AppState, id: Uuid) -> BackendResult<db::Comment> {
    db::get_comment(&app_state.db_pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Comment not found"))
}

/// `POST /comments/{post}`: returns the updated post
pub async fn create_comment(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
    Json(request): Json<CommentRequest>,
) -> BackendResult<(StatusCode, Json<PostView>)> {
    let me = auth_user.user();
    let text = validate_text(&request.text)?;
    let post = visible_post(&app_state, post_id, me).await?;

    let comment = db::create_comment(&app_state.db_pool, post.id, me.id, &text).await?;
    notify(
        &app_state.db_pool,
        me.id,
        post.user_id,
        Some(post.id),
        NotificationAction::Commented,
    )
    .await?;
    tracing::info!("{} commented on post {}: {}", me.username, post.id, comment.id);

    let view = posts::load_view(&app_state.db_pool, post).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /comments/{post}`: newest first
pub async fn list_comments(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
) -> BackendResult<Json<CommentList>> {
    let post = visible_post(&app_state, post_id, auth_user.user()).await?;
    let comments = db::list_for_post(&app_state.db_pool, post.id).await?;
    Ok(Json(db::load_views(&app_state.db_pool, comments).await?))
}

pub async fn update_comment(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    Json(request): Json<CommentRequest>,
) -> BackendResult<(StatusCode, Json<CommentView>)> {
    let me = auth_user.user();
    let text = validate_text(&request.text)?;
    let comment = find_comment(&app_state, id).await?;
    visible_post(&app_state, comment.post_id, me).await?;

    let comment = db::update_own_comment(&app_state.db_pool, comment.id, me.id, &text)
        .await?
        .ok_or_else(|| BackendError::unauthorized("User not Authorized"))?;
    let view = db::load_view(&app_state.db_pool, comment).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn toggle_like(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<(StatusCode, Json<CommentView>)> {
    let me = auth_user.user();
    let comment = find_comment(&app_state, id).await?;
    visible_post(&app_state, comment.post_id, me).await?;

    db::toggle_like(&app_state.db_pool, comment.id, me.id).await?;
    let view = db::load_view(&app_state.db_pool, comment).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `DELETE /comments/{id}`: removes the comment if the caller wrote it
pub async fn delete_comment(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<&'static str> {
    let me = auth_user.user();
    if db::delete_own_comment(&app_state.db_pool, id, me.id).await? {
        tracing::info!("{} deleted comment {}", me.username, id);
    }
    Ok("DELETED")
}
