//! Stories Module
//!
//! - **`db`** - Story rows, expiry filter and the purge query
//! - **`handlers`** - HTTP handlers under `/stories`

pub mod db;
pub mod handlers;
