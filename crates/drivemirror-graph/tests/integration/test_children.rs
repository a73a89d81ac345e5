//! Integration tests for paginated child listings

use drivemirror_core::domain::{HashAlgorithm, PageCursor};
use drivemirror_core::ports::{ICloudProvider, RemoteError};
use drivemirror_graph::{children, GraphCloudProvider};

use crate::common::{self, DRIVE};

const SHA1_A: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";
const SHA1_B: &str = "84983E441C3BD26EBAAE4AA1F95129E5E54670F1";

#[tokio::test]
async fn test_list_children_single_page() {
    let (server, client) = common::setup_graph_mock().await;

    common::mount_children_first_page(
        &server,
        "root",
        serde_json::json!([
            common::file_json("01A", "a.txt", 3, SHA1_A),
            common::folder_json("01D", "Docs"),
        ]),
        None,
    )
    .await;

    let page = children::list_children(&client, &common::drive(), &common::item("root"), None)
        .await
        .expect("listing failed");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name, "a.txt");
    assert_eq!(
        page.items[0].hash.as_ref().unwrap().algorithm(),
        HashAlgorithm::Sha1
    );
    assert!(page.items[1].is_folder());
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn test_list_children_follows_next_link() {
    let (server, client) = common::setup_graph_mock().await;

    let next = format!(
        "{}/drives/{DRIVE}/items/root/children?$skiptoken=page2",
        server.uri()
    );
    common::mount_children_first_page(
        &server,
        "root",
        serde_json::json!([common::file_json("01A", "a.txt", 3, SHA1_A)]),
        Some(next.clone()),
    )
    .await;
    common::mount_children_next_page(
        &server,
        "root",
        "page2",
        serde_json::json!([common::file_json("01B", "b.txt", 56, SHA1_B)]),
    )
    .await;

    let provider = GraphCloudProvider::new(client);
    let drive = common::drive();
    let root = common::item("root");

    let first = provider.list_children(&drive, &root, None).await.unwrap();
    assert_eq!(first.items.len(), 1);
    let cursor = first.next_cursor.expect("expected a continuation cursor");
    assert_eq!(cursor, PageCursor::new(next));

    let second = provider
        .list_children(&drive, &root, Some(&cursor))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].name, "b.txt");
    assert_eq!(second.items[0].hash.as_ref().unwrap().hex(), SHA1_B.to_lowercase());
    assert!(second.next_cursor.is_none());
}

#[tokio::test]
async fn test_list_children_missing_folder_is_not_found() {
    let (_server, client) = common::setup_graph_mock().await;

    // Nothing mounted: wiremock answers 404
    let err = children::list_children(&client, &common::drive(), &common::item("gone"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::NotFound(_)), "got {err:?}");
}
