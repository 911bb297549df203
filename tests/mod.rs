//! Test suite for Photogram
//!
//! Drives the real router through `axum-test` against an in-memory database.

pub mod integration;
