//! Backend Error Module
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions and status mapping
//! └── conversion.rs - IntoResponse implementation and the 404 fallback
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

/// Result alias used by handlers and store helpers
pub type BackendResult<T> = Result<T, BackendError>;
