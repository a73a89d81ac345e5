//! Paginated child listings
//!
//! Lists one page of a folder's children with
//! `GET /drives/{drive-id}/items/{item-id}/children?$top=200` and hands back
//! the absolute `@odata.nextLink` as the continuation cursor. Following
//! pages are fetched from that URL unchanged.
//!
//! See: <https://learn.microsoft.com/en-us/graph/api/driveitem-list-children>

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use drivemirror_core::domain::{
    ContentHash, DriveId, HashAlgorithm, ItemId, ItemKind, PageCursor, RemoteItem,
};
use drivemirror_core::ports::{ChildrenPage, RemoteError};

use crate::client::GraphClient;
use crate::paths::GraphPath;

/// Page size requested from Graph
pub const PAGE_SIZE: u32 = 200;

// ============================================================================
// Microsoft Graph API response types (JSON deserialization)
// ============================================================================

/// Raw response from a children listing
#[derive(Debug, Deserialize)]
pub(crate) struct GraphChildrenResponse {
    #[serde(default)]
    pub(crate) value: Vec<GraphDriveItem>,

    /// URL for the next page of results (present when more pages exist)
    #[serde(rename = "@odata.nextLink")]
    pub(crate) next_link: Option<String>,
}

/// A driveItem resource
///
/// Only the facets the engine reads are modelled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphDriveItem {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) size: Option<u64>,
    pub(crate) last_modified_date_time: Option<DateTime<Utc>>,
    pub(crate) file: Option<GraphFileFacet>,
    pub(crate) folder: Option<serde_json::Value>,
    pub(crate) package: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphFileFacet {
    hashes: Option<GraphHashes>,
}

/// Hash values for a file
///
/// `quickXorHash` is also reported by OneDrive but cannot be compared
/// against local content without reimplementing the algorithm, so it is
/// not read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphHashes {
    sha256_hash: Option<String>,
    sha1_hash: Option<String>,
}

// ============================================================================
// ItemParser - converts Graph API responses to port-level types
// ============================================================================

/// Parser for converting Graph driveItems into [`RemoteItem`]s
pub struct ItemParser;

impl ItemParser {
    /// Parse a single driveItem
    ///
    /// - The `folder` facet makes the item a folder
    /// - The `package` facet marks it as non-downloadable
    /// - SHA-256 is preferred over SHA-1; malformed digests are treated as absent
    pub(crate) fn parse_item(item: GraphDriveItem) -> Result<RemoteItem, RemoteError> {
        let id = ItemId::new(item.id)
            .map_err(|e| RemoteError::InvalidResponse(format!("driveItem '{}': {e}", item.name)))?;

        let kind = if item.folder.is_some() {
            ItemKind::Folder
        } else {
            ItemKind::File
        };

        let hash = item
            .file
            .as_ref()
            .and_then(|f| f.hashes.as_ref())
            .and_then(|h| Self::strong_hash(h, &item.name));

        Ok(RemoteItem {
            id,
            name: item.name,
            kind,
            is_package: item.package.is_some(),
            size: item.size,
            last_modified_utc: item.last_modified_date_time,
            hash,
        })
    }

    fn strong_hash(hashes: &GraphHashes, name: &str) -> Option<ContentHash> {
        let candidates = [
            (HashAlgorithm::Sha256, hashes.sha256_hash.as_deref()),
            (HashAlgorithm::Sha1, hashes.sha1_hash.as_deref()),
        ];
        candidates.into_iter().find_map(|(algorithm, value)| {
            let value = value?;
            match ContentHash::new(algorithm, value) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    debug!(name, error = %e, "Ignoring malformed remote hash");
                    None
                }
            }
        })
    }

    /// Parse a complete listing page
    pub(crate) fn parse_page(response: GraphChildrenResponse) -> Result<ChildrenPage, RemoteError> {
        let items = response
            .value
            .into_iter()
            .map(Self::parse_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChildrenPage {
            items,
            next_cursor: response.next_link.map(PageCursor::new),
        })
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Path of the first children page for a folder
pub fn children_path(drive: &DriveId, item: &ItemId) -> String {
    GraphPath::new()
        .segment("drives")
        .segment(drive.as_str())
        .segment("items")
        .segment(item.as_str())
        .segment("children")
        .with_query(&format!("$top={PAGE_SIZE}"))
}

/// Fetches one page of a folder's children
///
/// With `cursor = None` the first page is requested; otherwise the cursor's
/// absolute URL is fetched as-is.
pub async fn list_children(
    client: &GraphClient,
    drive: &DriveId,
    item: &ItemId,
    cursor: Option<&PageCursor>,
) -> Result<ChildrenPage, RemoteError> {
    let url = match cursor {
        Some(cursor) => cursor.as_str().to_string(),
        None => format!("{}{}", client.base_url(), children_path(drive, item)),
    };

    let raw: GraphChildrenResponse = client.get_json_at(&url).await?;
    let page = ItemParser::parse_page(raw)?;

    debug!(
        drive = %drive,
        item = %item,
        items = page.items.len(),
        has_next = page.next_cursor.is_some(),
        "Received children page"
    );

    Ok(page)
}

// ============================================================================
// Tests
// ============================================================================
