//! Integration tests for the Gerrit REST client.
//!
//! These run against a local wiremock server and verify the client's wire
//! behavior: the `/a/` authenticated prefix, Basic auth, XSSI prefix
//! stripping, and the status-code to error-taxonomy mapping.

use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gerrit_cli::core::config::ServerConfig;
use gerrit_cli::core::types::ChangeIdentifier;
use gerrit_cli::gerrit::{Gerrit, GerritError, GerritRest, ReviewInput};

fn server_config(uri: &str) -> ServerConfig {
    ServerConfig {
        url: uri.to_string(),
        username: "jdoe".to_string(),
        password: "secret".to_string(),
    }
}

fn change_body(number: u64) -> String {
    format!(
        ")]}}'\n{{\
            \"id\": \"foo%2Fbar~main~I{number:040x}\",\
            \"project\": \"foo/bar\",\
            \"branch\": \"main\",\
            \"change_id\": \"I{number:040x}\",\
            \"subject\": \"Fix the frobnicator\",\
            \"status\": \"NEW\",\
            \"_number\": {number},\
            \"current_revision\": \"abc123\",\
            \"revisions\": {{\"abc123\": {{\"_number\": 2}}}}\
        }}"
    )
}

fn id(raw: &str) -> ChangeIdentifier {
    ChangeIdentifier::parse(raw).unwrap()
}

#[tokio::test]
async fn get_change_hits_authenticated_prefix_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/changes/12345"))
        .and(basic_auth("jdoe", "secret"))
        .and(query_param("o", "CURRENT_REVISION"))
        .respond_with(ResponseTemplate::new(200).set_body_string(change_body(12345)))
        .expect(1)
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    let change = gerrit
        .get_change(&id("12345"), &["CURRENT_REVISION"])
        .await
        .unwrap();

    assert_eq!(change.number, 12345);
    assert_eq!(change.project, "foo/bar");
    assert_eq!(change.current_patch_set(), Some(2));
}

#[tokio::test]
async fn xssi_prefix_is_stripped_before_parsing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/changes/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string(change_body(7)))
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    assert!(gerrit.get_change(&id("7"), &[]).await.is_ok());
}

#[tokio::test]
async fn missing_change_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/changes/999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found: 999"))
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    let err = gerrit.get_change(&id("999"), &[]).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("999"));
}

#[tokio::test]
async fn bad_credentials_map_to_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/changes/1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    let err = gerrit.get_change(&id("1"), &[]).await.unwrap_err();
    assert!(matches!(err, GerritError::AuthFailed(_)));
}

#[tokio::test]
async fn server_errors_map_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/changes/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    let err = gerrit.get_change(&id("1"), &[]).await.unwrap_err();
    assert!(matches!(err, GerritError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Port 1 is never listening.
    let gerrit = GerritRest::new(&server_config("http://127.0.0.1:1"));
    let err = gerrit.get_change(&id("1"), &[]).await.unwrap_err();
    assert!(matches!(err, GerritError::NetworkError(_)));
}

#[tokio::test]
async fn garbage_body_is_an_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/changes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(")]}'\nnot json at all"))
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    let err = gerrit.get_change(&id("1"), &[]).await.unwrap_err();
    assert!(matches!(err, GerritError::InvalidResponse(_)));
}

#[tokio::test]
async fn query_changes_sends_query_and_limit() {
    let server = MockServer::start().await;
    // change_body() carries the 5-byte XSSI prefix; reuse just the object.
    let body = format!(")]}}'\n[{}]", &change_body(42)[5..]);
    Mock::given(method("GET"))
        .and(path("/a/changes/"))
        .and(query_param("q", "status:open project:foo/bar"))
        .and(query_param("n", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    let changes = gerrit
        .query_changes("status:open project:foo/bar", 10, &[])
        .await
        .unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].number, 42);
}

#[tokio::test]
async fn set_review_posts_labels_to_current_revision() {
    let server = MockServer::start().await;
    let expected = serde_json::json!({
        "message": "LGTM",
        "labels": {"Code-Review": 2}
    });
    Mock::given(method("POST"))
        .and(path("/a/changes/12345/revisions/current/review"))
        .and(body_json(&expected))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(")]}'\n{\"labels\":{\"Code-Review\":2}}"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    let mut review = ReviewInput::message_only("LGTM");
    review.labels = Some(std::collections::BTreeMap::from([(
        "Code-Review".to_string(),
        2,
    )]));
    let result = gerrit
        .set_review(&id("12345"), "current", review)
        .await
        .unwrap();
    assert_eq!(result.labels.unwrap()["Code-Review"], 2);
}

#[tokio::test]
async fn project_qualified_identifier_is_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a/changes/foo%2Fbar~main~I0000000000000000000000000000000000000001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(change_body(1)))
        .expect(1)
        .mount(&server)
        .await;

    let gerrit = GerritRest::new(&server_config(&server.uri()));
    let triplet = "foo/bar~main~I0000000000000000000000000000000000000001";
    assert!(gerrit.get_change(&id(triplet), &[]).await.is_ok());
}
