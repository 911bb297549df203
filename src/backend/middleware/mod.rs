//! Middleware Module
//!
//! Request processing middleware.
//!
//! - **`auth`** - Bearer token verification and the `AuthUser` extractor
//! - **`path`** - `ApiPath`, a `Path` extractor with JSON rejections

/// Authentication middleware
pub mod auth;

pub mod path;

pub use auth::{require_auth, AuthUser, AuthenticatedUser};
pub use path::ApiPath;
