//! Comments Module
//!
//! - **`db`** - Comment rows and comment likes
//! - **`handlers`** - HTTP handlers under `/comments`

pub mod db;
pub mod handlers;
