//! Mock server state management.
//!
//! Provides the in-memory data store for the mock GitHub API server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Repository;

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Repositories indexed by lowercased login, in listing order.
    pub repositories: HashMap<String, Vec<Repository>>,

    /// Status codes forced for a login (e.g. 500 for "broken").
    pub failures: HashMap<String, u16>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// Absolute base URL used in generated `Link` headers.
    /// Filled in by the server once it is bound.
    pub base_url: String,

    /// Every `(login, page, per_page)` served, in arrival order.
    pub requests: Vec<(String, u32, u32)>,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a user and their repositories.
    pub fn with_user(mut self, login: &str, repos: Vec<Repository>) -> Self {
        self.repositories.insert(login.to_lowercase(), repos);
        self
    }

    /// Make every request for `login` answer with `status`.
    pub fn with_failure(mut self, login: &str, status: u16) -> Self {
        self.failures.insert(login.to_lowercase(), status);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// All repositories of a user. Logins are case-insensitive.
    pub fn list_repositories(&self, login: &str) -> Option<&[Repository]> {
        self.repositories
            .get(&login.to_lowercase())
            .map(Vec::as_slice)
    }

    /// Forced failure status for a user, if any.
    pub fn failure_for(&self, login: &str) -> Option<u16> {
        self.failures.get(&login.to_lowercase()).copied()
    }

    /// One page of a user's repositories and the total page count.
    ///
    /// Pages past the end are empty. An empty listing still has one page.
    pub fn page_of(&self, login: &str, page: u32, per_page: u32) -> Option<(Vec<Repository>, u32)> {
        let repos = self.list_repositories(login)?;
        let per_page = per_page.max(1) as usize;
        let total_pages = repos.len().div_ceil(per_page).max(1) as u32;

        let start = (page.max(1) as usize - 1) * per_page;
        let items = repos.iter().skip(start).take(per_page).cloned().collect();
        Some((items, total_pages))
    }
}
