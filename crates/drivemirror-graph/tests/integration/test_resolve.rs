//! Integration tests for task root resolution

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drivemirror_core::ports::{ICloudProvider, RemoteError, RootSpec};
use drivemirror_graph::GraphCloudProvider;

use crate::common::{self, DRIVE};

const SITE_ID: &str = "contoso.sharepoint.com,11111111,22222222";

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sites/contoso.sharepoint.com:/sites/Finance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": SITE_ID,
            "displayName": "Finance"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/sites/{SITE_ID}/drives")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [
                {
                    "id": "b!other",
                    "name": "Archive",
                    "webUrl": "https://contoso.sharepoint.com/sites/Finance/Archive"
                },
                {
                    "id": DRIVE,
                    "name": "Documents",
                    "webUrl": "https://contoso.sharepoint.com/sites/Finance/Shared%20Documents"
                }
            ]
        })))
        .mount(server)
        .await;
}

async fn mount_root_item(server: &MockServer, item_path: &str, id: &str, is_folder: bool) {
    let mut body = serde_json::json!({ "id": id, "name": "x" });
    if is_folder {
        body["folder"] = serde_json::json!({ "childCount": 0 });
    } else {
        body["file"] = serde_json::json!({});
    }
    Mock::given(method("GET"))
        .and(path(item_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn sharepoint(library: &str, folder: Option<&str>) -> RootSpec {
    RootSpec::SharePoint {
        site_url: "https://contoso.sharepoint.com/sites/Finance".into(),
        library: library.into(),
        folder: folder.map(str::to_string),
    }
}

#[tokio::test]
async fn test_resolve_sharepoint_library_root() {
    let (server, client) = common::setup_graph_mock().await;
    mount_site(&server).await;
    mount_root_item(&server, &format!("/drives/{DRIVE}/root"), "01ROOT", true).await;

    let provider = GraphCloudProvider::new(client);
    let root = provider
        .resolve_root(&sharepoint("documents", None))
        .await
        .expect("resolution failed");

    assert_eq!(root.container_id.as_str(), DRIVE);
    assert_eq!(root.root_item_id.as_str(), "01ROOT");
}

#[tokio::test]
async fn test_resolve_sharepoint_library_by_url_name_and_subfolder() {
    let (server, client) = common::setup_graph_mock().await;
    mount_site(&server).await;
    mount_root_item(
        &server,
        &format!("/drives/{DRIVE}/root:/Reports/2024"),
        "01SUB",
        true,
    )
    .await;

    let provider = GraphCloudProvider::new(client);
    let root = provider
        .resolve_root(&sharepoint("Shared Documents", Some("Reports/2024")))
        .await
        .unwrap();

    assert_eq!(root.root_item_id.as_str(), "01SUB");
}

#[tokio::test]
async fn test_resolve_unknown_library_is_not_found() {
    let (server, client) = common::setup_graph_mock().await;
    mount_site(&server).await;

    let provider = GraphCloudProvider::new(client);
    let err = provider
        .resolve_root(&sharepoint("Payroll", None))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::NotFound(ref m) if m.contains("Payroll")), "got {err:?}");
}

#[tokio::test]
async fn test_resolve_file_path_is_not_found() {
    let (server, client) = common::setup_graph_mock().await;
    mount_site(&server).await;
    mount_root_item(&server, &format!("/drives/{DRIVE}/root:/notes.txt"), "01F", false).await;

    let provider = GraphCloudProvider::new(client);
    let err = provider
        .resolve_root(&sharepoint("Documents", Some("notes.txt")))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::NotFound(_)));
}

#[tokio::test]
async fn test_resolve_onedrive_user() {
    let (server, client) = common::setup_graph_mock().await;

    Mock::given(method("GET"))
        .and(path("/users/alex@contoso.com/drive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": DRIVE,
            "name": "OneDrive",
            "driveType": "business"
        })))
        .mount(&server)
        .await;
    mount_root_item(&server, &format!("/drives/{DRIVE}/root"), "01ROOT", true).await;

    let provider = GraphCloudProvider::new(client);
    let root = provider
        .resolve_root(&RootSpec::OneDrive {
            user: "alex@contoso.com".into(),
            folder: None,
        })
        .await
        .unwrap();

    assert_eq!(root.container_id.as_str(), DRIVE);
    assert_eq!(root.root_item_id.as_str(), "01ROOT");
}

#[tokio::test]
async fn test_resolve_forbidden_site_is_access_denied() {
    let (server, client) = common::setup_graph_mock().await;

    Mock::given(method("GET"))
        .and(path("/sites/contoso.sharepoint.com:/sites/Finance"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let provider = GraphCloudProvider::new(client);
    let err = provider
        .resolve_root(&sharepoint("Documents", None))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::AccessDenied(_)));
}
