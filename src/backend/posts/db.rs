//! Database operations for posts
//!
//! A post row holds the text and media; tags, likes and comments live in
//! their own tables and are gathered into a `PostView` by [`load_view`].

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::backend::auth::users::{get_user_by_id, User, USER_COLUMNS};
use crate::shared::social::{PostView, PublicUser};

const POST_COLUMNS: &str = "id, user_id, text, image, location, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    /// Author
    pub user_id: Uuid,
    pub text: String,
    pub image: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn create_post<'c>(
    db: impl SqliteExecutor<'c>,
    user_id: Uuid,
    text: &str,
    image: Option<&str>,
    location: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let now = Utc::now();
    let sql = format!(
        r#"
        INSERT INTO posts (id, user_id, text, image, location, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        POST_COLUMNS
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(text)
        .bind(image)
        .bind(location)
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await
}

pub async fn add_tag<'c>(db: impl SqliteExecutor<'c>, post_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, user_id) VALUES (?, ?)")
        .bind(post_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_post(pool: &SqlitePool, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let sql = format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS);
    sqlx::query_as::<_, Post>(&sql).bind(id).fetch_optional(pool).await
}

/// Change text and/or location; `None` keeps the current value
pub async fn update_post(
    pool: &SqlitePool,
    id: Uuid,
    text: Option<&str>,
    location: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE posts SET text = COALESCE(?, text), location = COALESCE(?, location), updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        POST_COLUMNS
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(text)
        .bind(location)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn set_image(pool: &SqlitePool, id: Uuid, image: &str) -> Result<Post, sqlx::Error> {
    let sql = format!(
        "UPDATE posts SET image = ?, updated_at = ? WHERE id = ? RETURNING {}",
        POST_COLUMNS
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(image)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Delete a post with its comments, likes, tags, saves and notifications
pub async fn delete_post(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Like or unlike; returns whether the post is liked afterwards
pub async fn toggle_like(pool: &SqlitePool, post_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if removed.rows_affected() > 0 {
        return Ok(false);
    }

    sqlx::query("INSERT INTO post_likes (post_id, user_id, created_at) VALUES (?, ?, ?)")
        .bind(post_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(true)
}

/// Posts by the viewer and everyone they follow, newest first
pub async fn list_feed(
    pool: &SqlitePool,
    viewer_id: Uuid,
    limit: u32,
    offset: u32,
) -> Result<(Vec<Post>, u64), sqlx::Error> {
    let filter = "user_id = ?1 OR user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?1)";

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM posts WHERE {}", filter))
        .bind(viewer_id)
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "SELECT {} FROM posts WHERE {} ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
        POST_COLUMNS, filter
    );
    let posts = sqlx::query_as::<_, Post>(&sql)
        .bind(viewer_id)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(pool)
        .await?;

    Ok((posts, total as u64))
}

pub async fn list_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM posts WHERE user_id = ? ORDER BY created_at DESC",
        POST_COLUMNS
    );
    sqlx::query_as::<_, Post>(&sql).bind(user_id).fetch_all(pool).await
}

pub async fn count_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

/// Authors whose posts `?2` may see: themselves, public accounts and accounts they follow
const VISIBLE_AUTHOR: &str = r#"(posts.user_id = ?2
        OR posts.user_id IN (SELECT id FROM users WHERE is_private = 0)
        OR posts.user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?2))"#;

/// Posts `user_id` is tagged in that `viewer_id` may see, newest first
pub async fn list_tagged(pool: &SqlitePool, user_id: Uuid, viewer_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM posts WHERE id IN (SELECT post_id FROM post_tags WHERE user_id = ?1) AND {} ORDER BY created_at DESC",
        POST_COLUMNS, VISIBLE_AUTHOR
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(user_id)
        .bind(viewer_id)
        .fetch_all(pool)
        .await
}

/// Posts the user saved and can still see, most recently saved first
pub async fn list_saved(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT posts.id, posts.user_id, posts.text, posts.image, posts.location,
               posts.created_at, posts.updated_at
        FROM posts
        JOIN saved_posts ON saved_posts.post_id = posts.id
        WHERE saved_posts.user_id = ?1 AND {}
        ORDER BY saved_posts.created_at DESC
        "#,
        VISIBLE_AUTHOR
    );
    sqlx::query_as::<_, Post>(&sql)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

async fn tagged_users(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM users WHERE id IN (SELECT user_id FROM post_tags WHERE post_id = ?) ORDER BY username",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql).bind(post_id).fetch_all(pool).await
}

async fn like_ids(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT user_id FROM post_likes WHERE post_id = ? ORDER BY created_at")
        .bind(post_id)
        .fetch_all(pool)
        .await
}

async fn comment_ids(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM comments WHERE post_id = ? ORDER BY created_at")
        .bind(post_id)
        .fetch_all(pool)
        .await
}

/// Assemble the response payload of a post
pub async fn load_view(pool: &SqlitePool, post: Post) -> Result<PostView, sqlx::Error> {
    let author = get_user_by_id(pool, post.user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    let tags = tagged_users(pool, post.id).await?;

    Ok(PostView {
        id: post.id,
        user: PublicUser::from(&author),
        tags: tags.iter().map(PublicUser::from).collect(),
        likes: like_ids(pool, post.id).await?,
        comments: comment_ids(pool, post.id).await?,
        text: post.text,
        image: post.image,
        location: post.location,
        created_at: post.created_at,
        updated_at: post.updated_at,
    })
}

pub async fn load_views(pool: &SqlitePool, posts: Vec<Post>) -> Result<Vec<PostView>, sqlx::Error> {
    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
        views.push(load_view(pool, post).await?);
    }
    Ok(views)
}
