//! Integration tests
//!
//! End-to-end tests of the HTTP API.

pub mod api;
