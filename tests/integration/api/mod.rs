//! API integration tests, one module per resource

pub mod auth_test;
pub mod notifications_test;
pub mod posts_test;
pub mod stories_test;
pub mod users_test;
