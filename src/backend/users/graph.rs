//! Follow graph and saved posts
//!
//! Edges are rows in `follows` (follower → followed) and `saved_posts`
//! (user → post). Toggles report the state after the change.

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::backend::auth::users::{User, USER_COLUMNS};

/// Add a follow edge; `false` if it already existed
pub async fn follow<'c>(
    db: impl SqliteExecutor<'c>,
    follower_id: Uuid,
    followed_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO follows (follower_id, followed_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(follower_id)
    .bind(followed_id)
    .bind(Utc::now())
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn unfollow(pool: &SqlitePool, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
        .bind(follower_id)
        .bind(followed_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn is_following(pool: &SqlitePool, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = ? AND followed_id = ?")
            .bind(follower_id)
            .bind(followed_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn follower_count(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followed_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

pub async fn following_count(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

/// Users following `user_id`, by username
pub async fn list_followers(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM users WHERE id IN (SELECT follower_id FROM follows WHERE followed_id = ?) ORDER BY username",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql).bind(user_id).fetch_all(pool).await
}

/// Users `user_id` follows, by username
pub async fn list_following(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM users WHERE id IN (SELECT followed_id FROM follows WHERE follower_id = ?) ORDER BY username",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql).bind(user_id).fetch_all(pool).await
}

/// Whether `viewer_id` may see the content of `owner`
///
/// Public accounts are visible to everyone; private ones to their followers
/// and to themselves.
pub async fn can_view(pool: &SqlitePool, viewer_id: Uuid, owner: &User) -> Result<bool, sqlx::Error> {
    if !owner.private || owner.id == viewer_id {
        return Ok(true);
    }
    is_following(pool, viewer_id, owner.id).await
}

/// Save or unsave a post; returns whether it is saved afterwards
pub async fn toggle_saved(pool: &SqlitePool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let removed = sqlx::query("DELETE FROM saved_posts WHERE user_id = ? AND post_id = ?")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;
    if removed.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query("INSERT INTO saved_posts (user_id, post_id, created_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(post_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(true)
}
