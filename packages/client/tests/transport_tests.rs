//! HTTP-level tests for the reqwest transport, backed by wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use congress_client::transport::CongressClient;
use congress_client::Transport;

#[tokio::test]
async fn test_get_returns_body_and_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bill/118/hr"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bills": [{"number": "1"}],
            "pagination": {"count": 1, "next": null}
        })))
        .mount(&server)
        .await;

    let client = CongressClient::with_base_url("test-key", server.uri()).unwrap();
    let (body, status) = client.get("bill/118/hr").await.unwrap();

    assert_eq!(status, 200);
    assert_eq!(body["bills"][0]["number"], "1");
}

#[tokio::test]
async fn test_get_sends_api_key_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/member"))
        .and(header("x-api-key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"members": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = CongressClient::with_base_url("secret-key", server.uri()).unwrap();
    let (_, status) = client.get("member").await.unwrap();
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_non_success_status_is_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bill/999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Unknown congress"})),
        )
        .mount(&server)
        .await;

    let client = CongressClient::with_base_url("test-key", server.uri()).unwrap();
    let (body, status) = client.get("bill/999").await.unwrap();

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Unknown congress");
}

#[tokio::test]
async fn test_non_json_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bill"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = CongressClient::with_base_url("test-key", server.uri()).unwrap();
    assert!(client.get("bill").await.is_err());
}

#[tokio::test]
async fn test_leading_slash_in_path_is_tolerated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/committee/house"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"committees": []})))
        .mount(&server)
        .await;

    let client = CongressClient::with_base_url("test-key", server.uri()).unwrap();
    let (_, status) = client.get("/committee/house").await.unwrap();
    assert_eq!(status, 200);
}
