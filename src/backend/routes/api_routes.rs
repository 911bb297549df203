/**
 * API Routes
 *
 * One function per resource. Each returns a router whose protected routes
 * are wrapped in `require_auth`; public routes are added after the
 * `route_layer` call so they stay open.
 *
 * # Routes
 *
 * ## Users
 * - `POST /users/register`, `POST /users/login`, `POST /users/refreshToken`
 * - `GET /users/facebookLogin`, `GET /users/facebookRedirect`
 * - `GET /users` - public directory
 * - everything else under `/users` requires a token
 *
 * ## Posts, Comments, Notifications, Stories
 * - all routes require a token
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::auth::handlers as auth;
use crate::backend::comments::handlers as comments;
use crate::backend::middleware::require_auth;
use crate::backend::notifications::handlers as notifications;
use crate::backend::posts::handlers as posts;
use crate::backend::server::state::AppState;
use crate::backend::stories::handlers as stories;
use crate::backend::users::handlers as users;

/// `/users` routes
pub fn user_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users/logOut", post(auth::log_out))
        .route("/users/logOutAll", post(auth::log_out_all))
        .route("/users/suggested", get(users::suggested))
        .route(
            "/users/me",
            get(users::get_me).put(users::update_me).delete(users::delete_me),
        )
        .route("/users/me/changePassword", put(users::change_password))
        .route("/users/me/profileImage", put(users::profile_image))
        .route("/users/me/follow/{username}", post(users::toggle_follow))
        .route("/users/saved/{id}", post(users::toggle_saved))
        .route("/users/{username}", get(users::get_profile))
        .route("/users/{username}/followers", get(users::followers))
        .route("/users/{username}/following", get(users::following))
        .route_layer(from_fn_with_state(app_state, require_auth))
        .route("/users", get(users::list_users))
        .route("/users/register", post(auth::register))
        .route("/users/login", post(auth::login))
        .route("/users/refreshToken", post(auth::refresh_token))
        .route("/users/facebookLogin", get(auth::facebook_login))
        .route("/users/facebookRedirect", get(auth::facebook_redirect))
}

/// `/posts` routes
pub fn post_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::feed).post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/{id}/image", put(posts::upload_image))
        .route("/posts/{id}/like", post(posts::toggle_like))
        .route_layer(from_fn_with_state(app_state, require_auth))
}

/// `/comments` routes
///
/// `{id}` is the post id for `GET`/`POST` and the comment id otherwise.
pub fn comment_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/comments/{id}",
            get(comments::list_comments)
                .post(comments::create_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/comments/{id}/like", post(comments::toggle_like))
        .route_layer(from_fn_with_state(app_state, require_auth))
}

/// `/notifications` routes
pub fn notification_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/{id}", delete(notifications::delete_notification))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .route("/notifications/{id}/accept", post(notifications::accept_request))
        .route_layer(from_fn_with_state(app_state, require_auth))
}

/// `/stories` routes
pub fn story_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stories", get(stories::list_stories).post(stories::create_story))
        .route("/stories/{id}", delete(stories::delete_story))
        .route_layer(from_fn_with_state(app_state, require_auth))
}
