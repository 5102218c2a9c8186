//! HTTP surface: route handlers and per-request middleware.

pub mod health;
pub mod request_id;
pub mod worker;
