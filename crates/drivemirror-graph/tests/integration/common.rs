//! Shared test helpers for Graph API integration tests
//!
//! Provides wiremock-based mock server setup for Microsoft Graph API endpoints.
//! Each helper mounts the necessary mock endpoints on a caller-owned server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drivemirror_core::domain::{DriveId, ItemId};
use drivemirror_graph::client::GraphClient;

pub const DRIVE: &str = "b!drive-001";

/// Starts a mock server and returns a client pointing at it
pub async fn setup_graph_mock() -> (MockServer, GraphClient) {
    let server = MockServer::start().await;
    let client = GraphClient::with_base_url("test-access-token", server.uri());
    (server, client)
}

pub fn drive() -> DriveId {
    DriveId::new(DRIVE).unwrap()
}

pub fn item(id: &str) -> ItemId {
    ItemId::new(id).unwrap()
}

/// A file driveItem with a SHA-1 hash
pub fn file_json(id: &str, name: &str, size: u64, sha1: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "size": size,
        "lastModifiedDateTime": "2024-05-01T12:00:00Z",
        "file": { "mimeType": "text/plain", "hashes": { "sha1Hash": sha1 } }
    })
}

/// A folder driveItem
pub fn folder_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "folder": { "childCount": 1 }
    })
}

/// Mounts the first children page of `item_id`
pub async fn mount_children_first_page(
    server: &MockServer,
    item_id: &str,
    items: serde_json::Value,
    next_link: Option<String>,
) {
    let mut body = serde_json::json!({ "value": items });
    if let Some(next) = next_link {
        body["@odata.nextLink"] = serde_json::Value::String(next);
    }
    Mock::given(method("GET"))
        .and(path(format!("/drives/{DRIVE}/items/{item_id}/children")))
        .and(query_param("$top", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts a continuation page addressed by `$skiptoken`
pub async fn mount_children_next_page(
    server: &MockServer,
    item_id: &str,
    skiptoken: &str,
    items: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(format!("/drives/{DRIVE}/items/{item_id}/children")))
        .and(query_param("$skiptoken", skiptoken))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": items
        })))
        .mount(server)
        .await;
}

/// Mounts a content download endpoint
pub async fn mount_download(server: &MockServer, item_id: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/drives/{DRIVE}/items/{item_id}/content")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}
