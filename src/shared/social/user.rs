//! User Payloads
//!
//! Three redaction levels exist for a user:
//!
//! - [`PublicUser`] is embedded in every other payload (post authors, comment
//!   authors, follower lists). It carries nothing private.
//! - [`UserProfile`] is what a signed-in user sees when opening someone else's
//!   profile. Content lists are dropped for private accounts the viewer does
//!   not follow.
//! - [`MeProfile`] is the owner's own view, including email and saved posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PostView, StoryView};
use crate::shared::error::SharedError;
use crate::shared::pagination::Links;

/// Minimal, always-safe user representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub img: String,
    pub bio: Option<String>,
    pub private: bool,
}

/// Account fields visible only to the account owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeUser {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub img: String,
    pub private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response of `GET /users/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeProfile {
    #[serde(flatten)]
    pub user: MeUser,
    pub followers: u64,
    pub following: u64,
    pub num_posts: u64,
    pub posts: Vec<PostView>,
    pub saved: Vec<PostView>,
    pub tagged: Vec<PostView>,
    pub stories: Vec<StoryView>,
}

/// Response of `GET /users/{username}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: PublicUser,
    pub website: Option<String>,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers: u64,
    pub following: u64,
    pub num_posts: u64,
    /// Whether the viewer currently follows this user
    pub is_following: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<Vec<StoryView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagged: Option<Vec<PostView>>,
}

/// Paged list of users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<PublicUser>,
    pub links: Links,
    pub total: u64,
}

/// Result of the follow toggle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowResponse {
    pub user: PublicUser,
    /// Follower count of `user` after the toggle
    pub followers: u64,
    /// Whether the caller follows `user` after the toggle
    pub following: bool,
    /// Set when a follow request was sent to a private account instead
    pub requested: bool,
}

/// Result of the save toggle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedResponse {
    /// Whether the post is saved after the toggle
    pub saved: bool,
    /// Every post id the caller has saved
    pub posts: Vec<Uuid>,
}

/// Usernames are 3-30 chars of letters, digits, `_` and `.`
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return Err(SharedError::validation(
            "username",
            "Username must be between 3 and 30 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(SharedError::validation(
            "username",
            "Username may only contain letters, numbers, '_' and '.'",
        ));
    }
    Ok(())
}

/// Basic shape check: one `@`, something on both sides, a dot in the domain
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SharedError::validation("email", "Invalid email format"))
    }
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < 8 {
        return Err(SharedError::validation(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    Ok(())
}
