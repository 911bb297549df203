//! Server Module
//!
//! Everything needed to turn a `ServerConfig` into a running Axum application.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Environment configuration and database loading
//! └── init.rs         - Service wiring, background tasks, app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env` (or a builder in tests)
//! 2. **Database**: open the SQLite pool and run migrations
//! 3. **Integrations**: pick the image store, build the Facebook client
//! 4. **Background Tasks**: start the expired-story purge
//! 5. **Router Creation**: assemble all routes and middleware

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::ServerConfig;
pub use init::create_app;
pub use state::AppState;
