/**
 * User Handlers
 *
 * Profile, account and follow-graph endpoints under `/users`. The account
 * endpoints (register, login, tokens, Facebook) live in `auth::handlers`.
 *
 * Every handler except `list_users` runs behind `require_auth` and takes the
 * caller from the `AuthUser` extractor.
 */

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::Json,
};
use bcrypt::{hash, verify};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::auth::users::{
    delete_user, get_user_by_username, list_suggested, list_users as query_users,
    update_password_hash, update_user, User, UserUpdate,
};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::media::{read_image, ROOT_FOLDER};
use crate::backend::middleware::{ApiPath, AuthUser};
use crate::backend::notifications::db::{has_pending_request, notify};
use crate::backend::posts::db::list_saved;
use crate::backend::posts::handlers::visible_post;
use crate::backend::server::state::AppState;
use crate::backend::users::{graph, profile};
use crate::shared::pagination::PageQuery;
use crate::shared::social::user::{validate_email, validate_password, validate_username};
use crate::shared::social::{
    FollowResponse, MeProfile, MeUser, NotificationAction, PublicUser, SavedResponse, UserList,
    UserProfile,
};

/// Body of `PUT /users/me`
///
/// A `password` field is accepted and ignored; use `changePassword`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub img: Option<String>,
    pub private: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

fn to_public(users: &[User]) -> Vec<PublicUser> {
    users.iter().map(PublicUser::from).collect()
}

async fn find_user(app_state: &AppState, username: &str) -> BackendResult<User> {
    get_user_by_username(&app_state.db_pool, username)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

/// `GET /users`: public directory with search and paging
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<UserList>> {
    let (users, total) =
        query_users(&app_state.db_pool, page.search_term(), page.limit(), page.offset()).await?;

    Ok(Json(UserList {
        users: to_public(&users),
        links: page.links("/users", total),
        total,
    }))
}

/// `GET /users/suggested`: accounts the caller does not follow yet
pub async fn suggested(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Query(page): Query<PageQuery>,
) -> BackendResult<Json<UserList>> {
    let (users, total) = list_suggested(
        &app_state.db_pool,
        auth_user.user().id,
        page.limit(),
        page.offset(),
    )
    .await?;

    Ok(Json(UserList {
        users: to_public(&users),
        links: page.links("/users/suggested", total),
        total,
    }))
}

pub async fn get_me(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
) -> BackendResult<Json<MeProfile>> {
    Ok(Json(profile::me_profile(&app_state.db_pool, auth_user.user()).await?))
}

pub async fn update_me(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<UpdateMeRequest>,
) -> BackendResult<Json<MeUser>> {
    let username = request.username.map(|u| u.trim().to_string());
    let email = request.email.map(|e| e.trim().to_lowercase());
    if let Some(username) = &username {
        validate_username(username)?;
    }
    if let Some(email) = &email {
        validate_email(email)?;
    }

    let user = update_user(
        &app_state.db_pool,
        auth_user.user().id,
        UserUpdate {
            username,
            email,
            name: request.name,
            surname: request.surname,
            gender: request.gender,
            bio: request.bio,
            website: request.website,
            img: request.img,
            private: request.private,
        },
    )
    .await?;

    tracing::info!("Profile updated: {}", user.username);
    Ok(Json(MeUser::from(&user)))
}

pub async fn delete_me(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
) -> BackendResult<&'static str> {
    let user = auth_user.user();
    if !delete_user(&app_state.db_pool, user.id).await? {
        return Err(BackendError::not_found("User not found"));
    }
    tracing::info!("Account deleted: {}", user.username);
    Ok("Deleted")
}

pub async fn change_password(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> BackendResult<(StatusCode, &'static str)> {
    let user = auth_user.user();

    let matches = match user.password_hash.as_deref() {
        Some(stored) => verify(&request.old_password, stored)?,
        None => false,
    };
    if !matches {
        tracing::warn!("Password change with wrong password: {}", user.username);
        return Err(BackendError::unauthorized("Incorrect password Provided"));
    }

    validate_password(&request.new_password)?;
    let new_hash = hash(&request.new_password, app_state.auth().password_cost)?;
    update_password_hash(&app_state.db_pool, user.id, &new_hash).await?;

    tracing::info!("Password changed: {}", user.username);
    Ok((StatusCode::CREATED, "Password changed"))
}

/// `PUT /users/me/profileImage`: multipart field `image`
pub async fn profile_image(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> BackendResult<Json<MeUser>> {
    let user = auth_user.user();
    let file = read_image(&mut multipart, "image").await?;

    let url = app_state
        .images
        .upload(file.into_upload(ROOT_FOLDER, format!("{}_profile", user.username)))
        .await?;

    let updated = update_user(
        &app_state.db_pool,
        user.id,
        UserUpdate {
            img: Some(url),
            ..UserUpdate::default()
        },
    )
    .await?;

    Ok(Json(MeUser::from(&updated)))
}

/// `POST /users/me/follow/{username}`: follow, unfollow or request to follow
pub async fn toggle_follow(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(username): ApiPath<String>,
) -> BackendResult<(StatusCode, Json<FollowResponse>)> {
    let pool = &app_state.db_pool;
    let me = auth_user.user();
    let target = get_user_by_username(pool, &username)
        .await?
        .filter(|target| target.id != me.id)
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let (following, requested) = if graph::is_following(pool, me.id, target.id).await? {
        graph::unfollow(pool, me.id, target.id).await?;
        tracing::info!("{} unfollowed {}", me.username, target.username);
        (false, false)
    } else if target.private {
        if !has_pending_request(pool, me.id, target.id).await? {
            notify(pool, me.id, target.id, None, NotificationAction::FollowRequest).await?;
        }
        tracing::info!("{} asked to follow {}", me.username, target.username);
        (false, true)
    } else {
        graph::follow(pool, me.id, target.id).await?;
        notify(pool, me.id, target.id, None, NotificationAction::StartedFollowing).await?;
        tracing::info!("{} followed {}", me.username, target.username);
        (true, false)
    };

    let followers = graph::follower_count(pool, target.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(FollowResponse {
            user: PublicUser::from(&target),
            followers,
            following,
            requested,
        }),
    ))
}

pub async fn get_profile(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(username): ApiPath<String>,
) -> BackendResult<Json<UserProfile>> {
    let user = find_user(&app_state, &username).await?;
    Ok(Json(
        profile::user_profile(&app_state.db_pool, auth_user.user(), &user).await?,
    ))
}

async fn visible_user(app_state: &AppState, viewer: &User, username: &str) -> BackendResult<User> {
    let user = find_user(app_state, username).await?;
    if !graph::can_view(&app_state.db_pool, viewer.id, &user).await? {
        return Err(BackendError::unauthorized("This account is private"));
    }
    Ok(user)
}

pub async fn followers(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(username): ApiPath<String>,
) -> BackendResult<Json<Vec<PublicUser>>> {
    let user = visible_user(&app_state, auth_user.user(), &username).await?;
    let users = graph::list_followers(&app_state.db_pool, user.id).await?;
    Ok(Json(to_public(&users)))
}

pub async fn following(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(username): ApiPath<String>,
) -> BackendResult<Json<Vec<PublicUser>>> {
    let user = visible_user(&app_state, auth_user.user(), &username).await?;
    let users = graph::list_following(&app_state.db_pool, user.id).await?;
    Ok(Json(to_public(&users)))
}

/// `POST /users/saved/{id}`: save/unsave toggle
pub async fn toggle_saved(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(post_id): ApiPath<Uuid>,
) -> BackendResult<(StatusCode, Json<SavedResponse>)> {
    let pool = &app_state.db_pool;
    let user_id = auth_user.user().id;
    let post = visible_post(&app_state, post_id, auth_user.user()).await?;

    let saved = graph::toggle_saved(pool, user_id, post.id).await?;
    let posts = list_saved(pool, user_id).await?.iter().map(|p| p.id).collect();

    Ok((StatusCode::CREATED, Json(SavedResponse { saved, posts })))
}
