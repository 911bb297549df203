//! Profile assembly
//!
//! Builds the two profile payloads from the user row plus the follow graph,
//! posts and stories.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::backend::auth::users::User;
use crate::backend::posts::db as posts;
use crate::backend::stories::db as stories;
use crate::backend::users::graph;
use crate::shared::social::{MeProfile, MeUser, PublicUser, UserProfile};

/// The owner's own view
pub async fn me_profile(pool: &SqlitePool, user: &User) -> Result<MeProfile, sqlx::Error> {
    let own_posts = posts::list_by_user(pool, user.id).await?;

    Ok(MeProfile {
        user: MeUser::from(user),
        followers: graph::follower_count(pool, user.id).await?,
        following: graph::following_count(pool, user.id).await?,
        num_posts: own_posts.len() as u64,
        posts: posts::load_views(pool, own_posts).await?,
        saved: posts::load_views(pool, posts::list_saved(pool, user.id).await?).await?,
        tagged: posts::load_views(pool, posts::list_tagged(pool, user.id, user.id).await?).await?,
        stories: stories::load_views(
            pool,
            stories::list_active_by_user(pool, user.id, Utc::now()).await?,
        )
        .await?,
    })
}

/// Someone else's profile as seen by `viewer`
///
/// Content lists are left out when the viewer may not see the account.
pub async fn user_profile(pool: &SqlitePool, viewer: &User, user: &User) -> Result<UserProfile, sqlx::Error> {
    let is_following = graph::is_following(pool, viewer.id, user.id).await?;
    let visible = graph::can_view(pool, viewer.id, user).await?;

    let (posts, stories, tagged) = if visible {
        let posts = posts::load_views(pool, posts::list_by_user(pool, user.id).await?).await?;
        let stories = stories::load_views(
            pool,
            stories::list_active_by_user(pool, user.id, Utc::now()).await?,
        )
        .await?;
        let tagged =
            posts::load_views(pool, posts::list_tagged(pool, user.id, viewer.id).await?).await?;
        (Some(posts), Some(stories), Some(tagged))
    } else {
        (None, None, None)
    };

    Ok(UserProfile {
        user: PublicUser::from(user),
        website: user.website.clone(),
        gender: user.gender.clone(),
        created_at: user.created_at,
        followers: graph::follower_count(pool, user.id).await?,
        following: graph::following_count(pool, user.id).await?,
        num_posts: posts::count_by_user(pool, user.id).await?,
        is_following,
        posts,
        stories,
        tagged,
    })
}
