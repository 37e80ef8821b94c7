//! GitHub API client.
//!
//! Low-level HTTP client that handles configuration, authentication and raw
//! requests. Repository listing is implemented via the
//! [`RepositoryFetcher`](crate::RepositoryFetcher) trait.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use crate::error::{FetchError, Result};

pub(crate) const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("ghrepos/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level GitHub API client.
///
/// Holds no per-request state, so a single client can serve any number of
/// sessions. Clones share the same connection pool.
///
/// # Example
///
/// ```no_run
/// use ghrepos::GitHubClient;
///
/// # fn example() -> ghrepos::Result<()> {
/// // Create from environment variables
/// let client = GitHubClient::from_env()?;
///
/// // Or configure manually
/// let client = GitHubClient::new("https://api.github.com", None)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: Arc<Url>,
    token: Option<String>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client from environment variables.
    ///
    /// Uses `GITHUB_API_URL` for the base URL (defaults to
    /// `https://api.github.com`) and `GITHUB_TOKEN` for authentication when
    /// set. Anonymous access works but is heavily rate limited.
    ///
    /// # Errors
    ///
    /// Returns an error if `GITHUB_API_URL` is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty());

        Self::new(&base_url, token.as_deref())
    }

    /// Create a new client with the provided base URL and optional token.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or is not an HTTP(S) URL.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::Config(format!(
                "unsupported API URL scheme '{}'",
                base_url.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.map(str::to_string),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let mut request = self.http.get(url).query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
        {
            if remaining == "0" {
                tracing::warn!(%status, "GitHub rate limit exhausted");
            }
        }

        let detail = Self::extract_error_message(response).await;
        tracing::debug!(%status, detail = %detail, "GitHub API returned an error");

        Err(FetchError::from_status(status))
    }

    /// Extract the API's own error message from a failed response.
    async fn extract_error_message(response: Response) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return String::new(),
        };

        // GitHub errors look like {"message": "...", "documentation_url": "..."}
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = GitHubClient::new("https://api.github.com", Some("secret-token")).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("GitHubClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("secret-token"));
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = GitHubClient::new("https://api.github.com", None).unwrap();
        let client2 = GitHubClient::new("https://api.github.com/", None).unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_base_url_keeps_prefix() {
        let client = GitHubClient::new("https://ghe.example.com/api/v3", None).unwrap();
        let joined = client.base_url().join("users/octocat/repos").unwrap();
        assert_eq!(
            joined.as_str(),
            "https://ghe.example.com/api/v3/users/octocat/repos"
        );
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = GitHubClient::new("ftp://example.com", None).unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }

    #[test]
    fn test_rejects_garbage_url() {
        let err = GitHubClient::new("not a url", None).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
