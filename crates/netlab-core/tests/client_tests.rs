//! Integration tests for the logged HTTP client.

mod common;

use common::start_stub;
use netlab_core::network::{ApiClient, ApiRequest, LogKind, NetworkLog};
use netlab_core::{CancellationToken, ClientConfig, NetlabError, Post};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

fn client(base_url: &str, token: Option<&str>) -> ApiClient {
    let mut config = ClientConfig::new(base_url).with_timeout(Duration::from_secs(5));
    if let Some(token) = token {
        config = config.with_token(token);
    }
    ApiClient::new(&config, Arc::new(NetworkLog::new())).unwrap()
}

fn messages(client: &ApiClient) -> Vec<(LogKind, String)> {
    client
        .log()
        .snapshot()
        .into_iter()
        .map(|e| (e.kind, e.message))
        .collect()
}

#[tokio::test]
async fn test_success_logs_request_then_response() {
    let stub = start_stub().await;
    let client = client(&stub.base_url, None);

    let post: Post = client.get_json("/posts/1").await.unwrap();
    assert_eq!(post.title, "Post 1");

    assert_eq!(
        messages(&client),
        vec![
            (LogKind::Response, "200 /posts/1".to_string()),
            (LogKind::Request, "GET /posts/1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_error_status_is_logged_and_returned() {
    let stub = start_stub().await;
    let client = client(&stub.base_url, None);

    let err = client.get("/posts/999").await.unwrap_err();
    assert!(matches!(err, NetlabError::Status { status: 404, .. }));

    assert_eq!(
        messages(&client),
        vec![
            (LogKind::Error, "404 /posts/999".to_string()),
            (LogKind::Request, "GET /posts/999".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let stub = start_stub().await;
    let client = client(&stub.base_url, None);

    let err = client
        .get_with_timeout("/slow", Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(matches!(err, NetlabError::Timeout { .. }));

    let log = messages(&client);
    assert_eq!(log[0], (LogKind::Error, "Timeout: /slow".to_string()));
    assert_eq!(log[1], (LogKind::Request, "GET /slow".to_string()));
}

#[tokio::test]
async fn test_bearer_token_attached_when_configured() {
    let stub = start_stub().await;

    let with_token = client(&stub.base_url, Some("secret-token"));
    let echoed: Value = with_token.get_json("/whoami").await.unwrap();
    assert_eq!(echoed["authorization"], "Bearer secret-token");
    assert_eq!(echoed["contentType"], "application/json");

    let without_token = client(&stub.base_url, None);
    let echoed: Value = without_token.get_json("/whoami").await.unwrap();
    assert!(echoed["authorization"].is_null());
}

#[tokio::test]
async fn test_post_json_logs_created_status() {
    let stub = start_stub().await;
    let client = client(&stub.base_url, None);

    let response = client
        .post_json("/posts", &serde_json::json!({"title": "t", "body": "b", "userId": 1}))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(
        messages(&client)[0],
        (LogKind::Response, "201 /posts".to_string())
    );
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let stub = start_stub().await;
    let client = client(&stub.base_url, None);
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = client
        .send_cancellable(ApiRequest::get("/slow"), &token)
        .await
        .unwrap_err();
    assert!(matches!(err, NetlabError::Cancelled));
    assert_eq!(
        messages(&client),
        vec![
            (LogKind::Error, "Request cancelled".to_string()),
            (LogKind::Request, "GET /slow".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_dropped_request_still_gets_terminal_entry() {
    let stub = start_stub().await;
    let client = client(&stub.base_url, None);

    let result = tokio::time::timeout(Duration::from_millis(50), client.get("/slow")).await;
    assert!(result.is_err());

    assert_eq!(
        messages(&client),
        vec![
            (LogKind::Error, "Request cancelled".to_string()),
            (LogKind::Request, "GET /slow".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_every_call_pairs_entries() {
    let stub = start_stub().await;
    let client = client(&stub.base_url, None);

    for path in ["/posts/1", "/posts/500", "/posts/2"] {
        let _ = client.get(path).await;
    }

    let entries = client.log().snapshot();
    assert_eq!(entries.len(), 6);
    // Oldest first: request/terminal pairs in order.
    for pair in entries.rchunks(2).map(|c| c.to_vec()) {
        assert_eq!(pair[1].kind, LogKind::Request);
        assert_ne!(pair[0].kind, LogKind::Request);
        assert!(pair[0].id == pair[1].id + 1);
    }
}
