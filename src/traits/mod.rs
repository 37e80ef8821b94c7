//! Trait definitions for repository fetching.
//!
//! The controller only depends on [`RepositoryFetcher`]; the HTTP
//! implementation lives with the [`Repository`](crate::Repository) model.

mod fetch;

pub use fetch::RepositoryFetcher;

#[cfg(test)]
pub(crate) use fetch::MockRepositoryFetcher;
