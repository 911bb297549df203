//! Comment Payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PublicUser;

/// Longest comment accepted by the API
pub const MAX_COMMENT_CHARS: usize = 2200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Id of the commented post
    pub post: Uuid,
    pub user: PublicUser,
    pub text: String,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type CommentList = Vec<CommentView>;
