//! Notifications Module
//!
//! Notifications are written as a side effect of follows, likes, comments
//! and tags. [`db::notify`] is the only writer and never notifies a user
//! about their own action.

pub mod db;
pub mod handlers;
