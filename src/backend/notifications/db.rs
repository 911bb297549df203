//! Database operations for notifications

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::backend::auth::users::get_user_by_id;
use crate::shared::social::{NotificationAction, NotificationView, PublicUser};

const NOTIFICATION_COLUMNS: &str = "id, from_user_id, to_user_id, post_id, action, is_read, created_at";

/// A stored notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub post_id: Option<Uuid>,
    pub action: NotificationAction,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

fn from_row(row: &SqliteRow) -> Result<Notification, sqlx::Error> {
    let action: String = row.try_get("action")?;
    let action = NotificationAction::from_str(&action).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "action".to_string(),
        source: format!("unknown notification action: {}", action).into(),
    })?;

    Ok(Notification {
        id: row.try_get("id")?,
        from_user_id: row.try_get("from_user_id")?,
        to_user_id: row.try_get("to_user_id")?,
        post_id: row.try_get("post_id")?,
        action,
        read: row.try_get("is_read")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Record that `from` did `action` to `to`
///
/// Nothing is written when a user acts on their own content; returns the new
/// notification id otherwise.
pub async fn notify<'c>(
    db: impl SqliteExecutor<'c>,
    from: Uuid,
    to: Uuid,
    post: Option<Uuid>,
    action: NotificationAction,
) -> Result<Option<Uuid>, sqlx::Error> {
    if from == to {
        return Ok(None);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO notifications (id, from_user_id, to_user_id, post_id, action, is_read, created_at)
        VALUES (?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(id)
    .bind(from)
    .bind(to)
    .bind(post)
    .bind(action.as_str())
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(Some(id))
}

/// Whether `from` has an unanswered follow request to `to`
pub async fn has_pending_request(pool: &SqlitePool, from: Uuid, to: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE from_user_id = ? AND to_user_id = ? AND action = ? AND is_read = 0",
    )
    .bind(from)
    .bind(to)
    .bind(NotificationAction::FollowRequest.as_str())
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Notifications addressed to a user, newest first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
    unread_only: bool,
) -> Result<Vec<Notification>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM notifications WHERE to_user_id = ? AND (? = 0 OR is_read = 0) ORDER BY created_at DESC",
        NOTIFICATION_COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(pool)
        .await?;

    rows.iter().map(from_row).collect()
}

pub async fn get_notification(pool: &SqlitePool, id: Uuid) -> Result<Option<Notification>, sqlx::Error> {
    let sql = format!("SELECT {} FROM notifications WHERE id = ?", NOTIFICATION_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(from_row).transpose()
}

/// Mark one of the recipient's notifications read; `false` if it is not theirs
pub async fn mark_read<'c>(
    db: impl SqliteExecutor<'c>,
    id: Uuid,
    recipient: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND to_user_id = ?")
        .bind(id)
        .bind(recipient)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_notification(pool: &SqlitePool, id: Uuid, recipient: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND to_user_id = ?")
        .bind(id)
        .bind(recipient)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Resolve the sender for the response payload
pub async fn load_view(pool: &SqlitePool, notification: Notification) -> Result<NotificationView, sqlx::Error> {
    let from = get_user_by_id(pool, notification.from_user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    Ok(NotificationView {
        id: notification.id,
        from: PublicUser::from(&from),
        to: notification.to_user_id,
        post: notification.post_id,
        action: notification.action,
        read: notification.read,
        created_at: notification.created_at,
    })
}
