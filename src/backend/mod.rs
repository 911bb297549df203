//! Backend Module
//!
//! This module contains all server-side code for Photogram: an Axum HTTP
//! API for users, posts, comments, follows, notifications and stories on
//! top of SQLite.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Router assembly and per-resource routes
//! - **`auth`** - Users, sessions, Facebook login, account handlers
//! - **`users`** - Profiles, follow graph, saved posts
//! - **`posts`** - Posts, tags, likes, feed
//! - **`comments`** - Comments and comment likes
//! - **`notifications`** - Notifications and follow requests
//! - **`stories`** - 24-hour stories and their purge
//! - **`media`** - Image stores (Cloudinary, local disk)
//! - **`middleware`** - Bearer token authentication
//! - **`error`** - `BackendError` and its HTTP rendering
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── main.rs           - Server binary
//! ├── server/           - Config, state, init
//! ├── routes/           - Router
//! ├── auth/             - Accounts and tokens
//! ├── users/            - Profiles and follow graph
//! ├── posts/
//! ├── comments/
//! ├── notifications/
//! ├── stories/
//! ├── media/            - Image upload
//! ├── middleware/       - require_auth, AuthUser
//! └── error/            - Error types
//! ```
//!
//! # Error Handling
//!
//! Handlers return `BackendResult<T>` and propagate with `?`. `BackendError`
//! renders as `{"error": <message>, "status": <code>}`.

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Backend error types
#[cfg(feature = "ssr")]
pub mod error;

/// Authentication and user management
#[cfg(feature = "ssr")]
pub mod auth;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Image storage
#[cfg(feature = "ssr")]
pub mod media;

/// Profiles and the follow graph
#[cfg(feature = "ssr")]
pub mod users;

#[cfg(feature = "ssr")]
pub mod posts;

#[cfg(feature = "ssr")]
pub mod comments;

#[cfg(feature = "ssr")]
pub mod notifications;

#[cfg(feature = "ssr")]
pub mod stories;

#[cfg(all(test, feature = "ssr"))]
pub(crate) mod testing;

/// Re-export commonly used types
#[cfg(feature = "ssr")]
pub use server::create_app;
#[cfg(feature = "ssr")]
pub use error::BackendError;
