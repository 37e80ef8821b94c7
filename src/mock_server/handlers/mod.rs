//! HTTP request handlers for the mock server.

pub mod repositories;

pub use repositories::*;
