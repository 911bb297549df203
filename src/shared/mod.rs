//! Shared Types Module
//!
//! Wire types exchanged between the backend and its clients. Everything in here
//! is plain serde data: the backend builds these payloads from database rows,
//! and a client (or a test) can deserialize them back.
//!
//! # Module Structure
//!
//! - **`social`** - Users, posts, comments, notifications and stories as they
//!   appear in API responses, with field redaction already applied
//! - **`pagination`** - `limit`/`offset` query parameters and page links
//! - **`error`** - Validation and serialization errors shared by both sides
//!
//! # Naming
//!
//! Payloads keep the JSON shape the frontend was written against: ids serialize
//! as `_id` and fields use camelCase.

pub mod error;

pub mod pagination;

pub mod social;

pub use error::SharedError;
pub use pagination::{Links, PageQuery};
