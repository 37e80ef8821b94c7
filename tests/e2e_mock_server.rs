//! E2E tests using the mock GitHub server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use std::sync::Arc;

use ghrepos::mock_server::{Fixtures, MockServer, MockState};
use ghrepos::{FetchOutcome, GitHubClient, PaginationController, RepositoryFetcher};

fn controller(server: &MockServer, per_page: u32) -> PaginationController<GitHubClient> {
    let client = GitHubClient::new(server.url(), None).unwrap();
    PaginationController::with_page_size(Arc::new(client), per_page)
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Session Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_load_until_end_workflow() {
    let server = MockServer::start().await;
    let controller = controller(&server, 2);

    // Step 1: first page
    let outcome = controller.search("octocat").await;
    assert_eq!(outcome, FetchOutcome::Loaded { fetched: 2, has_more: true });

    // Step 2: keep loading while more pages exist
    while controller.snapshot().has_more {
        controller.load_more().await;
    }

    // Step 3: everything accumulated in order
    let state = controller.snapshot();
    let ids: Vec<u64> = state.repos.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(state.current_page, 3);
    assert!(!state.has_more);
    assert_eq!(state.error, None);

    let pages: Vec<u32> = server.requests().await.iter().map(|(_, p, _)| *p).collect();
    assert_eq!(pages, vec![1, 2, 3]);

    server.shutdown().await;
}

#[tokio::test]
async fn test_new_search_replaces_previous_user() {
    let server = MockServer::start().await;
    let controller = controller(&server, 2);

    controller.search("octocat").await;
    controller.load_more().await;
    assert_eq!(controller.snapshot().repos.len(), 4);

    controller.search("hubot").await;
    let state = controller.snapshot();
    assert_eq!(state.username.as_deref(), Some("hubot"));
    assert_eq!(state.repos.len(), 1);
    assert_eq!(state.repos[0].id, 100);
    assert_eq!(state.current_page, 1);
    assert!(!state.has_more);

    server.shutdown().await;
}

#[tokio::test]
async fn test_empty_user_has_no_more_pages() {
    let server = MockServer::start().await;
    let controller = controller(&server, 30);

    let outcome = controller.search("empty-user").await;

    assert_eq!(outcome, FetchOutcome::Loaded { fetched: 0, has_more: false });
    let state = controller.snapshot();
    assert!(state.repos.is_empty());
    assert_eq!(state.error, None);

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_user_reports_not_found() {
    let server = MockServer::start().await;
    let controller = controller(&server, 30);

    controller.search("ghost-user").await;

    let state = controller.snapshot();
    assert_eq!(state.error.as_deref(), Some("404 Not Found"));
    assert!(state.repos.is_empty());
    assert_eq!(state.current_page, 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_server_error_during_load_more() {
    let server = MockServer::start().await;
    let controller = controller(&server, 2);

    controller.search("octocat").await;
    let before = controller.snapshot();

    // The user starts failing between pages
    server.state().write().await.failures.insert("octocat".to_string(), 500);
    let outcome = controller.load_more().await;

    assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    let state = controller.snapshot();
    assert_eq!(state.error.as_deref(), Some("500 Internal Server Error"));
    assert_eq!(state.repos, before.repos);
    assert_eq!(state.current_page, 2);
    assert!(state.has_more);

    // Recovery resumes at the same page
    server.state().write().await.failures.clear();
    controller.load_more().await;
    let state = controller.snapshot();
    assert_eq!(state.error, None);
    assert_eq!(state.repos.len(), 4);
    assert_eq!(state.current_page, 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_logins_are_case_insensitive() {
    let state = MockState::new().with_user("MixedCase", Fixtures::repositories("MixedCase", 1, 3));
    let server = MockServer::with_state(state).await;
    let client = GitHubClient::new(server.url(), None).unwrap();

    let all = client.fetch_all("mixedcase", 1).await.unwrap();
    assert_eq!(all.len(), 3);

    server.shutdown().await;
}
