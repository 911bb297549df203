/**
 * Post Handlers
 *
 * `/posts` endpoints. All of them require authentication.
 *
 * Posts of private accounts are visible to the owner and their followers
 * only; everybody else gets `401`. Only the owner may edit or delete a post.
 */

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_id, get_user_by_username, User};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::media::{read_image, ROOT_FOLDER};
use crate::backend::middleware::{ApiPath, AuthUser};
use crate::backend::notifications::db::notify;
use crate::backend::posts::db::{self, Post};
use crate::backend::server::state::AppState;
use crate::backend::users::graph::can_view;
use crate::shared::pagination::PageQuery;
use crate::shared::social::{NotificationAction, PostList, PostView};

#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    pub text: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    /// Usernames to tag
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub text: Option<String>,
    pub location: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

async fn find_post(app_state: &AppState, id: Uuid) -> BackendResult<Post> {
    db::get_post(&app_state.db_pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))
}

/// Load a post the caller owns
async fn owned_post(app_state: &AppState, id: Uuid, user: &User) -> BackendResult<Post> {
    let post = find_post(app_state, id).await?;
    if post.user_id != user.id {
        tracing::warn!("{} tried to modify post {}", user.username, id);
        return Err(BackendError::unauthorized("User not Authorized"));
    }
    Ok(post)
}

/// Load a post the caller may see
///
/// Posts of private accounts are answered with `401` for anyone who does not
/// follow the author.
pub(crate) async fn visible_post(app_state: &AppState, id: Uuid, viewer: &User) -> BackendResult<Post> {
    let post = find_post(app_state, id).await?;
    let owner = get_user_by_id(&app_state.db_pool, post.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;
    if !can_view(&app_state.db_pool, viewer.id, &owner).await? {
        return Err(BackendError::unauthorized("This account is private"));
    }
    Ok(post)
}

pub async fn create_post(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<CreatePostRequest>,
) -> BackendResult<(StatusCode, Json<PostView>)> {
    let me = auth_user.user();
    let text = non_blank(request.text);
    let image = non_blank(request.image);
    if text.is_none() && image.is_none() {
        return Err(BackendError::bad_request("A post needs text or an image"));
    }

    let mut tagged = Vec::with_capacity(request.tags.len());
    for username in &request.tags {
        let user = get_user_by_username(&app_state.db_pool, username.trim())
            .await?
            .ok_or_else(|| BackendError::bad_request(format!("Unknown user: {}", username)))?;
        if !tagged.iter().any(|t: &User| t.id == user.id) {
            tagged.push(user);
        }
    }

    let mut tx = app_state.db_pool.begin().await?;
    let post = db::create_post(
        &mut *tx,
        me.id,
        text.as_deref().unwrap_or_default(),
        image.as_deref(),
        non_blank(request.location).as_deref(),
    )
    .await?;
    for user in &tagged {
        db::add_tag(&mut *tx, post.id, user.id).await?;
        notify(&mut *tx, me.id, user.id, Some(post.id), NotificationAction::Tagged).await?;
    }
    tx.commit().await?;

    tracing::info!("{} created post {} with {} tags", me.username, post.id, tagged.len());
    let view = db::load_view(&app_state.db_pool, post).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `PUT /posts/{id}/image`: multipart field `image`
pub async fn upload_image(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    mut multipart: Multipart,
) -> BackendResult<Json<PostView>> {
    let post = owned_post(&app_state, id, auth_user.user()).await?;
    let file = read_image(&mut multipart, "image").await?;

    let url = app_state
        .images
        .upload(file.into_upload(ROOT_FOLDER, post.id.to_string()))
        .await?;
    let post = db::set_image(&app_state.db_pool, post.id, &url).await?;

    Ok(Json(db::load_view(&app_state.db_pool, post).await?))
}

/// `GET /posts`: the caller's feed
pub async fn feed(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<PostList>> {
    let (posts, total) = db::list_feed(
        &app_state.db_pool,
        auth_user.user().id,
        page.limit(),
        page.offset(),
    )
    .await?;

    Ok(Json(PostList {
        posts: db::load_views(&app_state.db_pool, posts).await?,
        links: page.links("/posts", total),
        total,
    }))
}

pub async fn get_post(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<Json<PostView>> {
    let post = visible_post(&app_state, id, auth_user.user()).await?;
    Ok(Json(db::load_view(&app_state.db_pool, post).await?))
}

pub async fn update_post(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> BackendResult<Json<PostView>> {
    let post = owned_post(&app_state, id, auth_user.user()).await?;
    let post = db::update_post(
        &app_state.db_pool,
        post.id,
        request.text.as_deref(),
        request.location.as_deref(),
    )
    .await?;
    Ok(Json(db::load_view(&app_state.db_pool, post).await?))
}

pub async fn delete_post(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<&'static str> {
    let post = owned_post(&app_state, id, auth_user.user()).await?;
    db::delete_post(&app_state.db_pool, post.id).await?;
    tracing::info!("Post deleted: {}", post.id);
    Ok("DELETED")
}

/// `POST /posts/{id}/like`: like toggle
pub async fn toggle_like(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<(StatusCode, Json<PostView>)> {
    let me = auth_user.user();
    let post = visible_post(&app_state, id, me).await?;

    if db::toggle_like(&app_state.db_pool, post.id, me.id).await? {
        notify(
            &app_state.db_pool,
            me.id,
            post.user_id,
            Some(post.id),
            NotificationAction::LikedPost,
        )
        .await?;
    }

    let view = db::load_view(&app_state.db_pool, post).await?;
    Ok((StatusCode::CREATED, Json(view)))
}
