/**
 * Notification Handlers
 *
 * `/notifications` endpoints. A user can only see and act on notifications
 * addressed to them; anything else is reported as not found.
 */

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{ApiPath, AuthUser};
use crate::backend::notifications::db::{self, Notification};
use crate::backend::server::state::AppState;
use crate::backend::users::graph::follow;
use crate::shared::social::{NotificationAction, NotificationView};

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    /// Only return unread notifications
    #[serde(default)]
    pub unread: bool,
}

async fn own_notification(app_state: &AppState, id: Uuid, recipient: Uuid) -> BackendResult<Notification> {
    db::get_notification(&app_state.db_pool, id)
        .await?
        .filter(|n| n.to_user_id == recipient)
        .ok_or_else(|| BackendError::not_found("Notification not found"))
}

pub async fn list_notifications(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> BackendResult<Json<Vec<NotificationView>>> {
    let notifications =
        db::list_for_user(&app_state.db_pool, auth_user.user().id, query.unread).await?;

    let mut views = Vec::with_capacity(notifications.len());
    for notification in notifications {
        views.push(db::load_view(&app_state.db_pool, notification).await?);
    }
    Ok(Json(views))
}

pub async fn mark_read(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<Json<NotificationView>> {
    let me = auth_user.user().id;
    if !db::mark_read(&app_state.db_pool, id, me).await? {
        return Err(BackendError::not_found("Notification not found"));
    }
    let notification = own_notification(&app_state, id, me).await?;
    Ok(Json(db::load_view(&app_state.db_pool, notification).await?))
}

/// `POST /notifications/{id}/accept`: accept a follow request
pub async fn accept_request(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<(StatusCode, Json<NotificationView>)> {
    let me = auth_user.user();
    let request = own_notification(&app_state, id, me.id).await?;
    if request.action != NotificationAction::FollowRequest {
        return Err(BackendError::bad_request("Not a follow request"));
    }

    let mut tx = app_state.db_pool.begin().await?;
    if !follow(&mut *tx, request.from_user_id, me.id).await? {
        return Err(BackendError::bad_request("Follow request already accepted"));
    }
    db::mark_read(&mut *tx, request.id, me.id).await?;
    db::notify(
        &mut *tx,
        me.id,
        request.from_user_id,
        None,
        NotificationAction::FollowAccepted,
    )
    .await?;
    tx.commit().await?;

    tracing::info!("{} accepted follow request {}", me.username, request.id);
    let request = own_notification(&app_state, id, me.id).await?;
    let view = db::load_view(&app_state.db_pool, request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn delete_notification(
    State(app_state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> BackendResult<&'static str> {
    if !db::delete_notification(&app_state.db_pool, id, auth_user.user().id).await? {
        return Err(BackendError::not_found("Notification not found"));
    }
    Ok("DELETED")
}
