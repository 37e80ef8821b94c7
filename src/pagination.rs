//! Pagination utilities for GitHub list responses.

use serde::{Deserialize, Serialize};

use crate::link::LinkHeader;

/// Default number of repositories per page, matching GitHub's default.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// A page of results from the GitHub API.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Page number this page was fetched for (1-indexed).
    pub page: u32,
    /// Requested number of items per page.
    pub per_page: u32,
    /// Whether the response advertised a `next` page.
    pub has_more: bool,
    /// Page number of the `last` relation, when advertised.
    pub last_page: Option<u32>,
}

impl<T> Page<T> {
    /// Create a page from items and the response's `Link` header.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, per_page: u32, link: &LinkHeader) -> Self {
        Self {
            items,
            page,
            per_page,
            has_more: link.has_next(),
            last_page: link.page_for("last"),
        }
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            has_more: self.has_more,
            last_page: self.last_page,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Query parameters for paginated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub per_page: u32,
}

impl PaginationParams {
    /// Create pagination params for a specific page.
    #[must_use]
    pub fn for_page(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::for_page(1, DEFAULT_PAGE_SIZE)
    }
}
