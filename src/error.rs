//! Error types for repository fetches.

use thiserror::Error;

/// Errors that can occur while fetching a page of repositories.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Configuration is missing or incomplete.
    #[error("configuration required: {0}")]
    Config(String),

    /// Base URL or request path could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API answered with a non-success status.
    ///
    /// Displays as `"<code> <status text>"`, e.g. `404 Not Found`.
    #[error("{code} {status_text}")]
    HttpStatus { code: u16, status_text: String },

    /// Network-level failure (DNS, connect, timeout).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Config,
    HttpStatus,
    Transport,
    Decode,
}

impl FetchError {
    /// Build an [`FetchError::HttpStatus`] from a response status.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::HttpStatus {
            code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        }
    }

    /// Which part of the fetch failed.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Config(_) | Self::InvalidUrl(_) => FetchErrorKind::Config,
            Self::HttpStatus { .. } => FetchErrorKind::HttpStatus,
            Self::Transport(_) => FetchErrorKind::Transport,
            Self::Decode(_) => FetchErrorKind::Decode,
        }
    }

    /// The HTTP status code, if the API answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for fetch operations.
pub type Result<T> = core::result::Result<T, FetchError>;
