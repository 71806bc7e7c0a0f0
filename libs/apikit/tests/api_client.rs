//! Integration tests for the envelope-producing API client

use apikit::{ApiClient, Envelope, RequestOptions, TracedClient};
use httpmock::prelude::*;
use reqwest::Method;
use serde_json::json;
use tracing_test::traced_test;
use url::Url;

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(
        TracedClient::default(),
        Url::parse(&server.base_url()).unwrap(),
    )
}

#[tokio::test]
async fn ok_response_yields_successful_envelope() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/projects/")
            .header("content-type", "application/json")
            .header_exists("traceparent");
        then.status(200).json_body(json!({"items": [], "pagination": {"total": 0}}));
    });

    let envelope = client_for(&server).get("/projects/").await;

    mock.assert();
    assert_eq!(
        envelope,
        Envelope::completed(200, json!({"items": [], "pagination": {"total": 0}}))
    );
    assert!(envelope.is_success());
}

#[tokio::test]
async fn error_status_still_parses_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/auth/register");
        then.status(400).json_body(json!({"detail": "email taken"}));
    });

    let envelope = client_for(&server)
        .post("/auth/register", &json!({"email": "a@b.c"}))
        .await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.status(), Some(400));
    assert_eq!(envelope.data().unwrap()["detail"], "email taken");
}

#[tokio::test]
async fn post_sends_json_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/auth/register")
            .header("content-type", "application/json")
            .json_body(json!({"username": "user_000001"}));
        then.status(201).json_body(json!({"user_id": 1}));
    });

    let envelope = client_for(&server)
        .post("/auth/register", &json!({"username": "user_000001"}))
        .await;

    mock.assert();
    assert_eq!(envelope.status(), Some(201));
    assert!(envelope.is_success());
}

#[tokio::test]
async fn caller_headers_override_defaults() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/echo")
            .header("content-type", "text/plain")
            .header("authorization", "Bearer t0k3n")
            .body("raw");
        then.status(200).json_body(json!(true));
    });

    let options = RequestOptions::new()
        .method(Method::PUT)
        .header("Content-Type", "text/plain")
        .header("Authorization", "Bearer t0k3n")
        .body("raw");
    let envelope = client_for(&server).request("/echo", options).await;

    mock.assert();
    assert_eq!(envelope, Envelope::completed(200, json!(true)));
}

#[tokio::test]
#[traced_test]
async fn non_json_body_yields_failed_envelope() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/webinars/announcements");
        then.status(502).body("<html>Bad Gateway</html>");
    });

    let envelope = client_for(&server).get("/webinars/announcements").await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.status(), None);
    assert!(envelope.error().unwrap().contains("not valid JSON"));
    assert!(logs_contain("request failed"));
}

#[tokio::test]
async fn empty_body_yields_failed_envelope() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/empty");
        then.status(204);
    });

    let envelope = client_for(&server).get("/empty").await;
    assert!(envelope.error().is_some());
}

#[tokio::test]
async fn unreachable_server_yields_failed_envelope() {
    let client = ApiClient::new(
        TracedClient::default(),
        Url::parse("http://127.0.0.1:9").unwrap(),
    );

    let envelope = client.get("/projects/").await;

    assert!(!envelope.is_success());
    assert!(envelope.error().unwrap().starts_with("network error"));
}

#[tokio::test]
async fn invalid_header_yields_failed_envelope() {
    let server = MockServer::start();
    let options = RequestOptions::new().header("bad header", "x");

    let envelope = client_for(&server).request("/x", options).await;

    assert_eq!(envelope.error(), Some("invalid header 'bad header'"));
}
