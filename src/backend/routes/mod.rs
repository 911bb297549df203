//! Route Configuration Module
//!
//! - **`router`** - Application router and shared layers
//! - **`api_routes`** - One router per resource (`/users`, `/posts`,
//!   `/comments`, `/notifications`, `/stories`)
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports
//! ├── router.rs      - create_router
//! └── api_routes.rs  - Per-resource routers
//! ```

/// Main router creation
pub mod router;

/// Per-resource routes
pub mod api_routes;

pub use router::create_router;
