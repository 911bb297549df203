//! Authentication Handlers Module
//!
//! HTTP handlers for the account endpoints under `/users`.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports
//! ├── types.rs     - Request and response types
//! ├── register.rs  - POST /users/register
//! ├── login.rs     - POST /users/login
//! ├── tokens.rs    - refreshToken, logOut, logOutAll
//! └── facebook.rs  - facebookLogin, facebookRedirect
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email and password → user created → id returned
//! 2. **Login**: credentials verified → access and refresh token returned
//! 3. **Refresh**: stored refresh token → new pair, old one revoked
//! 4. **Logout**: refresh token revoked → redirect to the frontend

/// Request and response types
pub mod types;

pub mod facebook;
pub mod login;
pub mod register;
pub mod tokens;

pub use facebook::{facebook_login, facebook_redirect};
pub use login::login;
pub use register::register;
pub use tokens::{log_out, log_out_all, refresh_token};
