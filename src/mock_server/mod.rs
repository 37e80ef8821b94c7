//! Mock GitHub API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the
//! repository listing endpoint for integration and end-to-end testing.
//! Unlike wiremock, which mocks at the HTTP level per-test, this server
//! paginates real data and emits GitHub-style `Link` headers, enabling
//! realistic "load more" workflows.
//!
//! # Example
//!
//! ```ignore
//! use ghrepos::mock_server::MockServer;
//! use ghrepos::{GitHubClient, RepositoryFetcher};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = GitHubClient::new(server.url(), None).unwrap();
//!
//!     // Server comes with default fixtures
//!     let page = client.fetch_page("octocat", 1, 2).await.unwrap();
//!     assert!(page.has_more);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
