//! Repository listing endpoint handler.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

const DOCS_URL: &str = "https://docs.github.com/rest/repos/repos#list-repositories-for-a-user";

/// Query parameters for listing repositories.
#[derive(Debug, Default, Deserialize)]
pub struct ListReposQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /users/{username}/repos
pub async fn list_user_repos(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(username): Path<String>,
    Query(query): Query<ListReposQuery>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;

    if let Some(token) = &state.required_token {
        let expected = format!("Bearer {token}");
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return error_response(StatusCode::UNAUTHORIZED, "Bad credentials");
        }
    }

    // GitHub treats page=0 as page 1 and caps per_page at 100
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(30).clamp(1, 100);
    state.requests.push((username.clone(), page, per_page));

    if let Some(code) = state.failure_for(&username) {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return error_response(status, status.canonical_reason().unwrap_or("Error"));
    }

    let Some((items, total_pages)) = state.page_of(&username, page, per_page) else {
        return error_response(StatusCode::NOT_FOUND, "Not Found");
    };

    let mut response_headers = HeaderMap::new();
    let base = format!(
        "{}/users/{}/repos",
        state.base_url,
        urlencoding::encode(&username)
    );
    if let Some(link) = link_header(&base, page, per_page, total_pages) {
        if let Ok(value) = HeaderValue::from_str(&link) {
            response_headers.insert(header::LINK, value);
        }
    }

    (StatusCode::OK, response_headers, Json(items)).into_response()
}

/// Build GitHub's `Link` header: `prev`/`first` after page 1,
/// `next`/`last` before the final page.
fn link_header(base: &str, page: u32, per_page: u32, total_pages: u32) -> Option<String> {
    let target = |n: u32, rel: &str| format!("<{base}?page={n}&per_page={per_page}>; rel=\"{rel}\"");

    let mut links = Vec::new();
    if page > 1 {
        links.push(target(page - 1, "prev"));
    }
    if page < total_pages {
        links.push(target(page + 1, "next"));
        links.push(target(total_pages, "last"));
    }
    if page > 1 {
        links.push(target(1, "first"));
    }

    if links.is_empty() {
        None
    } else {
        Some(links.join(", "))
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "message": message,
            "documentation_url": DOCS_URL,
        })),
    )
        .into_response()
}
