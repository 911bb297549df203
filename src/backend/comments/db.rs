//! Database operations for comments

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::get_user_by_id;
use crate::shared::social::{CommentView, PublicUser};

const COMMENT_COLUMNS: &str = "id, post_id, user_id, text, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Author
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn create_comment(
    pool: &SqlitePool,
    post_id: Uuid,
    user_id: Uuid,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    let now = Utc::now();
    let sql = format!(
        r#"
        INSERT INTO comments (id, post_id, user_id, text, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        COMMENT_COLUMNS
    );
    sqlx::query_as::<_, Comment>(&sql)
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
}

pub async fn get_comment(pool: &SqlitePool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    let sql = format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLUMNS);
    sqlx::query_as::<_, Comment>(&sql).bind(id).fetch_optional(pool).await
}

/// Comments on a post, newest first
pub async fn list_for_post(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM comments WHERE post_id = ? ORDER BY created_at DESC",
        COMMENT_COLUMNS
    );
    sqlx::query_as::<_, Comment>(&sql).bind(post_id).fetch_all(pool).await
}

/// Replace the text of a comment owned by `user_id`
///
/// Returns `None` when no such comment belongs to the user.
pub async fn update_own_comment(
    pool: &SqlitePool,
    id: Uuid,
    user_id: Uuid,
    text: &str,
) -> Result<Option<Comment>, sqlx::Error> {
    let sql = format!(
        "UPDATE comments SET text = ?, updated_at = ? WHERE id = ? AND user_id = ? RETURNING {}",
        COMMENT_COLUMNS
    );
    sqlx::query_as::<_, Comment>(&sql)
        .bind(text)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Delete a comment if `user_id` wrote it
pub async fn delete_own_comment(pool: &SqlitePool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Like or unlike; returns whether the comment is liked afterwards
pub async fn toggle_like(pool: &SqlitePool, comment_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let removed = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
        .bind(comment_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if removed.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query("INSERT INTO comment_likes (comment_id, user_id, created_at) VALUES (?, ?, ?)")
        .bind(comment_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(true)
}

pub async fn load_view(pool: &SqlitePool, comment: Comment) -> Result<CommentView, sqlx::Error> {
    let author = get_user_by_id(pool, comment.user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    let likes: Vec<Uuid> =
        sqlx::query_scalar("SELECT user_id FROM comment_likes WHERE comment_id = ? ORDER BY created_at")
            .bind(comment.id)
            .fetch_all(pool)
            .await?;

    Ok(CommentView {
        id: comment.id,
        post: comment.post_id,
        user: PublicUser::from(&author),
        text: comment.text,
        likes,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    })
}

pub async fn load_views(pool: &SqlitePool, comments: Vec<Comment>) -> Result<Vec<CommentView>, sqlx::Error> {
    let mut views = Vec::with_capacity(comments.len());
    for comment in comments {
        views.push(load_view(pool, comment).await?);
    }
    Ok(views)
}
