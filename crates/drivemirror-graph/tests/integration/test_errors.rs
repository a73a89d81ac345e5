//! Integration tests for status normalization at the HTTP boundary

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use drivemirror_core::ports::RemoteError;
use drivemirror_graph::children;

use crate::common::{self, DRIVE};

async fn list_with_status(template: ResponseTemplate) -> RemoteError {
    let (server, client) = common::setup_graph_mock().await;
    Mock::given(method("GET"))
        .and(path(format!("/drives/{DRIVE}/items/root/children")))
        .respond_with(template)
        .mount(&server)
        .await;

    children::list_children(&client, &common::drive(), &common::item("root"), None)
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_429_with_retry_after_is_transient() {
    let err = list_with_status(ResponseTemplate::new(429).insert_header("Retry-After", "12")).await;
    assert!(err.is_retryable());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(12)));
}

#[tokio::test]
async fn test_504_without_retry_after_is_transient() {
    let err = list_with_status(ResponseTemplate::new(504)).await;
    assert!(matches!(
        err,
        RemoteError::Transient {
            status: 504,
            retry_after: None
        }
    ));
}

#[tokio::test]
async fn test_403_is_access_denied_with_graph_message() {
    let err = list_with_status(ResponseTemplate::new(403).set_body_json(serde_json::json!({
        "error": { "code": "accessDenied", "message": "Access denied" }
    })))
    .await;
    match err {
        RemoteError::AccessDenied(message) => assert!(message.contains("accessDenied")),
        other => panic!("expected AccessDenied, got {other:?}"),
    }
}

#[tokio::test]
async fn test_500_is_permanent_http_error() {
    let err = list_with_status(ResponseTemplate::new(500)).await;
    assert!(!err.is_retryable());
    assert!(matches!(err, RemoteError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_malformed_json_is_invalid_response() {
    let err = list_with_status(ResponseTemplate::new(200).set_body_string("{not json")).await;
    assert!(matches!(err, RemoteError::InvalidResponse(_)), "got {err:?}");
}
