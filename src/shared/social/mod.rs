//! Social Types
//!
//! Response payloads for the social API. Each view type is already redacted:
//! a `PublicUser` can be embedded anywhere without leaking credentials, the
//! email address or the follow graph.

pub mod comment;
pub mod notification;
pub mod post;
pub mod story;
pub mod user;

pub use comment::{CommentList, CommentView};
pub use notification::{NotificationAction, NotificationView};
pub use post::{PostList, PostView};
pub use story::StoryView;
pub use user::{
    FollowResponse, MeProfile, MeUser, PublicUser, SavedResponse, UserList, UserProfile,
};

/// Avatar assigned to accounts that never uploaded a picture
pub const DEFAULT_AVATAR: &str =
    "https://thumbs.dreamstime.com/b/default-avatar-profile-trendy-style-social-media-user-icon-187599373.jpg";
