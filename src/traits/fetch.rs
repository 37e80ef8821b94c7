//! Fetcher trait for paginated repository listings.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Repository;
use crate::pagination::Page;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// Fetch one page of a user's repositories.
///
/// Implementations hold no mutable state, so one fetcher can be shared by
/// any number of sessions.
///
/// # Example
///
/// ```ignore
/// use ghrepos::{GitHubClient, RepositoryFetcher};
///
/// let client = GitHubClient::from_env()?;
///
/// // Fetch a single page
/// let page = client.fetch_page("octocat", 1, 30).await?;
///
/// // Fetch all pages
/// let all = client.fetch_all("octocat", 100).await?;
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryFetcher: Send + Sync {
    /// Fetch page `page` (1-indexed) with `per_page` items per page.
    ///
    /// `username` is passed to the API as-is, even when empty.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success status, a transport failure, or an
    /// undecodable body.
    async fn fetch_page(&self, username: &str, page: u32, per_page: u32)
        -> Result<Page<Repository>>;

    /// Fetch every page, following `next` links until none is advertised.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn fetch_all(&self, username: &str, per_page: u32) -> Result<Vec<Repository>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let result = self.fetch_page(username, page, per_page).await?;
            all_items.extend(result.items);

            if !result.has_more {
                break;
            }
            page += 1;

            // Safety limit to prevent infinite loops
            if page > MAX_PAGES {
                tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
                break;
            }
        }

        Ok(all_items)
    }
}
