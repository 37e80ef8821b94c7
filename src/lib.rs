//! GitHub repository listing with incremental pagination.
//!
//! Fetches a user's repositories from the GitHub REST API one page at a
//! time and accumulates them in an observable session state, suitable for
//! driving a "load more" style presentation layer.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ghrepos::{GitHubClient, PaginationController, RepositoryFetcher};
//!
//! #[tokio::main]
//! async fn main() -> ghrepos::Result<()> {
//!     // Create client from environment variables
//!     let client = Arc::new(GitHubClient::from_env()?);
//!
//!     // Fetch a single page directly
//!     let page = client.fetch_page("octocat", 1, 30).await?;
//!     println!("{} repositories, more: {}", page.len(), page.has_more);
//!
//!     // Or drive a session
//!     let controller = PaginationController::new(client);
//!     let mut updates = controller.subscribe();
//!     controller.search("octocat").await;
//!     while let Ok(state) = updates.try_recv() {
//!         println!("loading={} repos={}", state.is_loading, state.repos.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`RepositoryFetcher`] - Fetch one page of a user's repositories;
//!   implemented over HTTP by [`GitHubClient`]
//! - [`PaginationController`] - Owns the [`SessionState`] and exposes
//!   `search` / `load_more`
//! - [`LinkHeader`] - Parses the `Link` header that signals further pages
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `GITHUB_API_URL` (optional) - Base URL (defaults to `https://api.github.com`)
//! - `GITHUB_TOKEN` (optional) - Bearer token for authenticated requests

pub mod cli;
mod client;
mod error;
mod link;
mod models;
pub mod output;
mod pagination;
mod session;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::GitHubClient;
pub use error::{FetchError, FetchErrorKind, Result};
pub use link::{Link, LinkHeader};
pub use pagination::{Page, PaginationParams, DEFAULT_PAGE_SIZE};
pub use session::{FetchOutcome, PaginationController, SessionPhase, SessionState};

// Re-export traits
pub use traits::RepositoryFetcher;

// Re-export models
pub use models::Repository;

// Re-export convenience functions
pub use models::{get_repositories, get_repositories_page};
