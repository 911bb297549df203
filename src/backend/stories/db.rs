//! Database operations for stories
//!
//! A story is active while `expires_at` lies in the future. Reads filter on
//! it; [`purge_expired`] removes the leftovers.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::auth::users::get_user_by_id;
use crate::shared::social::story::story_lifetime;
use crate::shared::social::{PublicUser, StoryView};

const STORY_COLUMNS: &str = "id, user_id, image, created_at, expires_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Story {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Insert a story created at `now` that expires after the story lifetime
pub async fn create_story(
    pool: &SqlitePool,
    id: Uuid,
    user_id: Uuid,
    image: &str,
    now: DateTime<Utc>,
) -> Result<Story, sqlx::Error> {
    let sql = format!(
        "INSERT INTO stories (id, user_id, image, created_at, expires_at) VALUES (?, ?, ?, ?, ?) RETURNING {}",
        STORY_COLUMNS
    );
    sqlx::query_as::<_, Story>(&sql)
        .bind(id)
        .bind(user_id)
        .bind(image)
        .bind(now)
        .bind(now + story_lifetime())
        .fetch_one(pool)
        .await
}

pub async fn get_story(pool: &SqlitePool, id: Uuid) -> Result<Option<Story>, sqlx::Error> {
    let sql = format!("SELECT {} FROM stories WHERE id = ?", STORY_COLUMNS);
    sqlx::query_as::<_, Story>(&sql).bind(id).fetch_optional(pool).await
}

/// Active stories of the viewer and the users they follow, newest first
pub async fn list_active_feed(
    pool: &SqlitePool,
    viewer_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<Story>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {} FROM stories
        WHERE expires_at > ?2
          AND (user_id = ?1 OR user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?1))
        ORDER BY created_at DESC
        "#,
        STORY_COLUMNS
    );
    sqlx::query_as::<_, Story>(&sql)
        .bind(viewer_id)
        .bind(now)
        .fetch_all(pool)
        .await
}

pub async fn list_active_by_user(
    pool: &SqlitePool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<Story>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM stories WHERE user_id = ? AND expires_at > ? ORDER BY created_at DESC",
        STORY_COLUMNS
    );
    sqlx::query_as::<_, Story>(&sql)
        .bind(user_id)
        .bind(now)
        .fetch_all(pool)
        .await
}

pub async fn delete_story(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM stories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every story that expired at or before `now`
pub async fn purge_expired(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM stories WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn load_view(pool: &SqlitePool, story: Story) -> Result<StoryView, sqlx::Error> {
    let author = get_user_by_id(pool, story.user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    Ok(StoryView {
        id: story.id,
        user: PublicUser::from(&author),
        image: story.image,
        created_at: story.created_at,
        expires_at: story.expires_at,
    })
}

pub async fn load_views(pool: &SqlitePool, stories: Vec<Story>) -> Result<Vec<StoryView>, sqlx::Error> {
    let mut views = Vec::with_capacity(stories.len());
    for story in stories {
        views.push(load_view(pool, story).await?);
    }
    Ok(views)
}
