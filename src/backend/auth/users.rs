/**
 * User Model and Database Operations
 *
 * This module owns the `users` and `refresh_tokens` tables. Relationship data
 * (follows, saved posts) lives with the modules that mutate it.
 */

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::shared::social::{MeUser, PublicUser};

pub(crate) const USER_COLUMNS: &str = "id, username, email, password_hash, name, surname, gender, bio, \
     website, img, is_private, facebook_id, created_at, updated_at";

/// User struct representing a user in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, case-insensitive)
    pub username: String,
    /// User email address (unique, case-insensitive)
    pub email: String,
    /// Hashed password (bcrypt); `None` for Facebook-only accounts
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    /// Avatar URL
    pub img: String,
    /// Private accounts approve followers and hide their content
    #[sqlx(rename = "is_private")]
    pub private: bool,
    pub facebook_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            img: user.img.clone(),
            bio: user.bio.clone(),
            private: user.private,
        }
    }
}

impl From<&User> for MeUser {
    fn from(user: &User) -> Self {
        MeUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            gender: user.gender.clone(),
            bio: user.bio.clone(),
            website: user.website.clone(),
            img: user.img.clone(),
            private: user.private,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Fields of a user about to be created
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub gender: Option<String>,
    pub img: String,
    pub private: bool,
    pub facebook_id: Option<String>,
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
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

/// Create a new user
pub async fn create_user(pool: &SqlitePool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let sql = format!(
        r#"
        INSERT INTO users (id, username, email, password_hash, name, surname, gender, img,
                           is_private, facebook_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.name)
        .bind(&new_user.surname)
        .bind(&new_user.gender)
        .bind(&new_user.img)
        .bind(new_user.private)
        .bind(&new_user.facebook_id)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
}

/// Get user by ID
pub async fn get_user_by_id<'c>(
    db: impl SqliteExecutor<'c>,
    id: Uuid,
) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(db).await
}

/// Get user by email (case-insensitive)
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql).bind(email).fetch_optional(pool).await
}

/// Get user by username (case-insensitive)
pub async fn get_user_by_username<'c>(
    db: impl SqliteExecutor<'c>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql).bind(username).fetch_optional(db).await
}

pub async fn get_user_by_facebook_id(
    pool: &SqlitePool,
    facebook_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE facebook_id = ?", USER_COLUMNS);
    sqlx::query_as::<_, User>(&sql).bind(facebook_id).fetch_optional(pool).await
}

/// Look up a user by the credentials identifier sent at login
///
/// An email takes precedence when both are supplied.
pub async fn get_user_by_login(
    pool: &SqlitePool,
    email: Option<&str>,
    username: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    match (email, username) {
        (Some(email), _) => get_user_by_email(pool, email).await,
        (None, Some(username)) => get_user_by_username(pool, username).await,
        (None, None) => Ok(None),
    }
}

pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Apply a partial update and return the updated user
pub async fn update_user(
    pool: &SqlitePool,
    id: Uuid,
    update: UserUpdate,
) -> Result<User, sqlx::Error> {
    let sql = format!(
        r#"
        UPDATE users SET
            username = COALESCE(?, username),
            email = COALESCE(?, email),
            name = COALESCE(?, name),
            surname = COALESCE(?, surname),
            gender = COALESCE(?, gender),
            bio = COALESCE(?, bio),
            website = COALESCE(?, website),
            img = COALESCE(?, img),
            is_private = COALESCE(?, is_private),
            updated_at = ?
        WHERE id = ?
        RETURNING {}
        "#,
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&sql)
        .bind(update.username)
        .bind(update.email)
        .bind(update.name)
        .bind(update.surname)
        .bind(update.gender)
        .bind(update.bio)
        .bind(update.website)
        .bind(update.img)
        .bind(update.private)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn update_password_hash(
    pool: &SqlitePool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a user; every owned row goes with it through `ON DELETE CASCADE`
pub async fn delete_user(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// List users newest first, optionally filtered by a search term
///
/// Returns the page and the total number of matching users.
pub async fn list_users(
    pool: &SqlitePool,
    search: Option<&str>,
    limit: u32,
    offset: u32,
) -> Result<(Vec<User>, u64), sqlx::Error> {
    let pattern = search.map(like_pattern);
    let filter = r#"(?1 IS NULL
        OR username LIKE ?1 ESCAPE '\'
        OR name LIKE ?1 ESCAPE '\'
        OR surname LIKE ?1 ESCAPE '\')"#;

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {}", filter))
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "SELECT {} FROM users WHERE {} ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
        USER_COLUMNS, filter
    );
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(&pattern)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(pool)
        .await?;

    Ok((users, total as u64))
}

/// Users the viewer does not follow yet, excluding the viewer
pub async fn list_suggested(
    pool: &SqlitePool,
    viewer_id: Uuid,
    limit: u32,
    offset: u32,
) -> Result<(Vec<User>, u64), sqlx::Error> {
    let filter = "id <> ?1 AND id NOT IN (SELECT followed_id FROM follows WHERE follower_id = ?1)";

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {}", filter))
        .bind(viewer_id)
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "SELECT {} FROM users WHERE {} ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
        USER_COLUMNS, filter
    );
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(viewer_id)
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(pool)
        .await?;

    Ok((users, total as u64))
}

pub async fn add_refresh_token(pool: &SqlitePool, user_id: Uuid, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO refresh_tokens (user_id, token, created_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(token)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove one stored refresh token; `false` when it was not stored
pub async fn remove_refresh_token(
    pool: &SqlitePool,
    user_id: Uuid,
    token: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ? AND token = ?")
        .bind(user_id)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn clear_refresh_tokens(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Stored refresh tokens of a user
#[cfg(test)]
pub(crate) async fn count_refresh_tokens(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}
