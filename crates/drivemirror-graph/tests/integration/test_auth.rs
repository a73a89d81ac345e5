//! Integration tests for client-credentials token acquisition

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drivemirror_core::config::AuthConfig;
use drivemirror_core::ports::RemoteError;
use drivemirror_graph::auth::{acquire_access_token, ClientCredentialsFlow};

fn auth_for(server: &MockServer) -> AuthConfig {
    AuthConfig {
        tenant_id: Some("tenant-1".into()),
        client_id: Some("client-1".into()),
        authority_host: server.uri(),
        ..AuthConfig::default()
    }
}

#[tokio::test]
async fn test_client_credentials_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_secret=s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "graph-token",
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = acquire_access_token(&auth_for(&server), |key| {
        (key == "DRIVEMIRROR_CLIENT_SECRET").then(|| "s3cret".to_string())
    })
    .await
    .expect("token request failed");

    assert_eq!(token.secret, "graph-token");
    assert!(token.expires_at.is_some());
}

#[tokio::test]
async fn test_rejected_credentials_are_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;

    let flow = ClientCredentialsFlow::new(&server.uri(), "tenant-1", "client-1", "wrong").unwrap();
    let err = flow.acquire().await.unwrap_err();

    assert!(
        matches!(err, RemoteError::AuthFailed(ref m) if m.contains("invalid_client")),
        "got {err:?}"
    );
}
