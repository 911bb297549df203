//! Users Module
//!
//! Profiles, account settings, the follow graph and saved posts.
//!
//! - **`graph`** - Follow edges, visibility checks and saved posts
//! - **`profile`** - Own and public profile assembly
//! - **`handlers`** - HTTP handlers under `/users`

pub mod graph;
pub mod handlers;
pub mod profile;
