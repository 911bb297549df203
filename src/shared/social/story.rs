//! Story Payloads

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PublicUser;

/// How long a story stays visible after it is posted
pub fn story_lifetime() -> Duration {
    Duration::hours(24)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoryView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: PublicUser,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
