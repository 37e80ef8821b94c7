//! Repository model and the HTTP fetcher implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::GitHubClient;
use crate::error::Result;
use crate::link::LinkHeader;
use crate::pagination::{Page, PaginationParams, DEFAULT_PAGE_SIZE};
use crate::traits::RepositoryFetcher;

/// A GitHub repository as returned by `GET /users/{username}/repos`.
///
/// Only `id`, `name` and `description` are required; the remaining fields
/// are decoded when present. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    /// Unique repository ID; identity of the record.
    pub id: u64,

    /// Repository name (e.g., "Hello-World").
    pub name: String,

    /// Free-form description, `null` when unset.
    #[serde(default)]
    pub description: Option<String>,

    /// Owner-qualified name (e.g., "octocat/Hello-World").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Browser URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,

    /// Primary language as detected by GitHub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stargazers_count: Option<u64>,

    /// Whether this repository is a fork.
    #[serde(default)]
    pub fork: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Create a record with only the required fields set.
    pub fn new(id: u64, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description,
            full_name: None,
            html_url: None,
            language: None,
            stargazers_count: None,
            fork: false,
            updated_at: None,
        }
    }

    /// Description, or an empty string when unset.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl RepositoryFetcher for GitHubClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_page(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Repository>> {
        let path = format!("users/{}/repos", urlencoding::encode(username));
        let params = PaginationParams::for_page(page, per_page);

        let response = self.get_with_query(&path, &params).await?;
        let link = LinkHeader::from_headers(response.headers());

        // Read the body first so transport and decode failures stay distinct
        let body = response.bytes().await?;
        let items: Vec<Repository> = serde_json::from_slice(&body)?;

        tracing::debug!(count = items.len(), has_next = link.has_next(), "fetched page");
        Ok(Page::new(items, page, per_page, &link))
    }
}

/// Fetch one page of a user's repositories.
///
/// # Example
///
/// ```ignore
/// use ghrepos::{GitHubClient, get_repositories_page};
///
/// let client = GitHubClient::from_env()?;
/// let page = get_repositories_page(&client, "octocat", 1, 30).await?;
/// println!("{} repos, more: {}", page.len(), page.has_more);
/// ```
pub async fn get_repositories_page(
    client: &GitHubClient,
    username: &str,
    page: u32,
    per_page: u32,
) -> Result<Page<Repository>> {
    client.fetch_page(username, page, per_page).await
}

/// Fetch every repository of a user, following pagination.
pub async fn get_repositories(client: &GitHubClient, username: &str) -> Result<Vec<Repository>> {
    client.fetch_all(username, DEFAULT_PAGE_SIZE).await
}
