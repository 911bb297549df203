//! Post Payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PublicUser;
use crate::shared::pagination::Links;

/// A post with its author and tagged users expanded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: PublicUser,
    pub text: String,
    pub image: Option<String>,
    pub location: Option<String>,
    pub tags: Vec<PublicUser>,
    /// Ids of the users who liked the post
    pub likes: Vec<Uuid>,
    /// Comment ids, oldest first
    pub comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }
}

/// Paged list of posts (the feed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostList {
    pub posts: Vec<PostView>,
    pub links: Links,
    pub total: u64,
}
