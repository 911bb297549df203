//! Posts Module
//!
//! - **`db`** - Post rows, tags, likes and the feed query
//! - **`handlers`** - HTTP handlers under `/posts`

/// Database operations for posts
pub mod db;

/// HTTP handlers
pub mod handlers;
