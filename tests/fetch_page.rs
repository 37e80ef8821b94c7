//! Execution tests for the HTTP repository fetcher.
//!
//! Uses wiremock to mock the GitHub API.

use ghrepos::{get_repositories, get_repositories_page, FetchErrorKind, GitHubClient, RepositoryFetcher};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repos_json(ids: &[u64]) -> serde_json::Value {
    serde_json::Value::Array(
        ids.iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "name": format!("repo-{id}"),
                    "description": if id % 2 == 0 { serde_json::Value::Null } else { format!("desc {id}").into() },
                    "private": false,
                    "owner": { "login": "octocat" }
                })
            })
            .collect(),
    )
}

fn next_link(server: &MockServer, next: u32, last: u32) -> String {
    format!(
        "<{uri}/user/583231/repos?page={next}&per_page=2>; rel=\"next\", \
         <{uri}/user/583231/repos?page={last}&per_page=2>; rel=\"last\"",
        uri = server.uri()
    )
}

#[tokio::test]
async fn test_fetch_page_sends_pagination_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(repos_json(&[1, 2]))
                .insert_header("link", next_link(&mock_server, 2, 4).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let page = client.fetch_page("octocat", 1, 2).await.unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.items[0].name, "repo-1");
    assert_eq!(page.items[0].description.as_deref(), Some("desc 1"));
    assert_eq!(page.items[1].description, None);
    assert!(page.has_more);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 2);
    assert_eq!(page.last_page, Some(4));
}

#[tokio::test]
async fn test_fetch_page_without_link_is_last() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repos_json(&[7])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let page = get_repositories_page(&client, "octocat", 4, 2).await.unwrap();

    assert_eq!(page.len(), 1);
    assert!(!page.has_more);
    assert_eq!(page.last_page, None);
}

#[tokio::test]
async fn test_fetch_page_link_without_next_is_last() {
    let mock_server = MockServer::start().await;

    let link = format!(
        "<{uri}/user/1/repos?page=1>; rel=\"first\", <{uri}/user/1/repos?page=2>; rel=\"prev\"",
        uri = mock_server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(repos_json(&[5]))
                .insert_header("link", link.as_str()),
        )
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let page = client.fetch_page("octocat", 3, 2).await.unwrap();
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_fetch_page_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost-user/repos"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let err = client.fetch_page("ghost-user", 1, 30).await.unwrap_err();

    assert_eq!(err.kind(), FetchErrorKind::HttpStatus);
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.to_string(), "404 Not Found");
}

#[tokio::test]
async fn test_fetch_page_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .set_body_json(serde_json::json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let err = client.fetch_page("octocat", 1, 30).await.unwrap_err();
    assert_eq!(err.to_string(), "403 Forbidden");
}

#[tokio::test]
async fn test_fetch_page_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "unexpected": "object"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let err = client.fetch_page("octocat", 1, 30).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Decode);
}

#[tokio::test]
async fn test_fetch_page_transport_error() {
    // Nothing listens on port 1
    let client = GitHubClient::new("http://127.0.0.1:1", None).unwrap();
    let err = client.fetch_page("octocat", 1, 30).await.unwrap_err();
    assert_eq!(err.kind(), FetchErrorKind::Transport);
}

#[tokio::test]
async fn test_fetch_page_sends_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repos_json(&[1])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), Some("t0ken")).unwrap();
    assert_eq!(client.fetch_page("octocat", 1, 30).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fetch_page_encodes_username() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/a%20b/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repos_json(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let page = client.fetch_page("a b", 1, 30).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_fetch_page_empty_username_is_passed_through() {
    let mock_server = MockServer::start().await;

    // Whatever the API answers is surfaced unchanged
    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let err = client.fetch_page("", 1, 30).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_get_repositories_follows_all_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(repos_json(&[1, 2]))
                .insert_header("link", next_link(&mock_server, 2, 2).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repos_json(&[3])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::new(&mock_server.uri(), None).unwrap();
    let all = get_repositories(&client, "octocat").await.unwrap();
    assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}
