//! Authentication Module
//!
//! This module handles registration, login, sessions and Facebook login.
//!
//! # Architecture
//!
//! - **`users`** - User model and database operations
//! - **`sessions`** - JWT access/refresh tokens and refresh token rotation
//! - **`oauth`** - Facebook Graph API client
//! - **`handlers`** - HTTP handlers for the account endpoints
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Access tokens expire after 15 minutes, refresh tokens after 7 days
//! - Refresh tokens are stored and rotated on use; logout revokes them
//! - Invalid credentials return 401 (no information leakage)

/// User data model and database operations
pub mod users;

/// JWT token management
pub mod sessions;

/// Facebook OAuth client
pub mod oauth;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{
    facebook_login, facebook_redirect, log_out, log_out_all, login, refresh_token, register,
};
pub use users::User;
