//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{TimeZone, Utc};

use crate::Repository;

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The data a default [`MockServer`](super::MockServer) starts with.
pub struct DefaultScenario {
    /// `(login, repositories)` pairs.
    pub users: Vec<(String, Vec<Repository>)>,
    /// `(login, status)` pairs that always fail.
    pub failures: Vec<(String, u16)>,
}

impl Fixtures {
    // =========================================================================
    // Repository Fixtures
    // =========================================================================

    /// Create a minimal repository with required fields only.
    pub fn minimal_repository(id: u64, name: &str) -> Repository {
        Repository::new(id, name, None)
    }

    /// Create a repository populated the way GitHub returns it.
    pub fn repository(owner: &str, id: u64, name: &str, description: Option<&str>) -> Repository {
        let mut repo = Repository::new(id, name, description.map(str::to_string));
        repo.full_name = Some(format!("{owner}/{name}"));
        repo.html_url = Some(format!("https://github.com/{owner}/{name}"));
        repo.language = Some("Rust".to_string());
        repo.stargazers_count = Some(id % 50);
        repo.updated_at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).single();
        repo
    }

    /// Create `count` repositories for `owner` with ids starting at `first_id`.
    ///
    /// Every third repository has no description.
    pub fn repositories(owner: &str, first_id: u64, count: u64) -> Vec<Repository> {
        (0..count)
            .map(|i| {
                let id = first_id + i;
                let name = format!("{owner}-repo-{}", i + 1);
                let description = (i % 3 != 2).then(|| format!("Repository number {}", i + 1));
                Self::repository(owner, id, &name, description.as_deref())
            })
            .collect()
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Default data set:
    ///
    /// - `octocat`: 5 repositories (ids 1..=5)
    /// - `hubot`: 1 repository (id 100)
    /// - `empty-user`: no repositories
    /// - `broken`: always answers 500
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            users: vec![
                ("octocat".to_string(), Self::repositories("octocat", 1, 5)),
                ("hubot".to_string(), Self::repositories("hubot", 100, 1)),
                ("empty-user".to_string(), vec![]),
            ],
            failures: vec![("broken".to_string(), 500)],
        }
    }
}
