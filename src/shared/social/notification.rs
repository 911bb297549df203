//! Notification Payloads
//!
//! Notifications are fan-out records written as a side effect of social
//! actions. The `action` is stored and sent as the sentence fragment the
//! frontend renders after the sender's username ("jane started following you").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PublicUser;

/// What the sender did
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NotificationAction {
    #[serde(rename = "started following you")]
    StartedFollowing,
    #[serde(rename = "asked to follow you")]
    FollowRequest,
    #[serde(rename = "accepted your follow request")]
    FollowAccepted,
    #[serde(rename = "left a comment")]
    Commented,
    #[serde(rename = "liked your post")]
    LikedPost,
    #[serde(rename = "tagged you in a post")]
    Tagged,
}

impl NotificationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationAction::StartedFollowing => "started following you",
            NotificationAction::FollowRequest => "asked to follow you",
            NotificationAction::FollowAccepted => "accepted your follow request",
            NotificationAction::Commented => "left a comment",
            NotificationAction::LikedPost => "liked your post",
            NotificationAction::Tagged => "tagged you in a post",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "started following you" => Some(NotificationAction::StartedFollowing),
            "asked to follow you" => Some(NotificationAction::FollowRequest),
            "accepted your follow request" => Some(NotificationAction::FollowAccepted),
            "left a comment" => Some(NotificationAction::Commented),
            "liked your post" => Some(NotificationAction::LikedPost),
            "tagged you in a post" => Some(NotificationAction::Tagged),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub from: PublicUser,
    /// Recipient id
    pub to: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Uuid>,
    pub action: NotificationAction,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
