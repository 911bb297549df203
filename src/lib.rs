//! Photogram - Main Library
//!
//! Photogram is the backend of a photo-sharing social network: accounts,
//! posts, comments, a follow graph with private accounts, notifications and
//! 24-hour stories, served as a JSON HTTP API.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types returned by the API
//!   - Redacted user views, post/comment/story views, notifications
//!   - Pagination query and links
//!   - Validation errors
//!
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature)
//!   - Axum HTTP server, routing and auth middleware
//!   - SQLite persistence through sqlx
//!   - JWT sessions with refresh token rotation, Facebook login
//!   - Image uploads to Cloudinary or the local filesystem
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use photogram::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env();
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for input validation
//! - `backend::BackendError` for everything a handler can fail with; it renders
//!   itself as a JSON error response

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
