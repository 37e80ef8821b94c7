//! GitHub API model types.

mod repository;

pub use repository::*;
