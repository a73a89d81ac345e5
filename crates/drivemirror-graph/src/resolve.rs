//! Task root resolution
//!
//! Turns a [`RootSpec`] into the drive id and folder item id the walker
//! starts from:
//!
//! - SharePoint: `GET /sites/{host}:/{site-path}` gives the site id,
//!   `GET /sites/{site-id}/drives` lists its document libraries, and the
//!   library is matched by name (case-insensitive)
//! - OneDrive: `GET /users/{user}/drive`
//! - Folder: `GET /drives/{drive-id}/root` or `/root:/{path}`

use serde::Deserialize;
use tracing::{debug, info};

use drivemirror_core::domain::{DriveId, ItemId};
use drivemirror_core::ports::{RemoteError, RemoteRoot, RootSpec};

use crate::client::GraphClient;
use crate::paths::{decode_segment, GraphPath};

// ============================================================================
// Graph API response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphSite {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphDrive {
    id: String,
    #[serde(default)]
    name: String,
    web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphDriveList {
    #[serde(default)]
    value: Vec<GraphDrive>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphRootItem {
    id: String,
    folder: Option<serde_json::Value>,
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolves a task's remote root
pub async fn resolve_root(client: &GraphClient, spec: &RootSpec) -> Result<RemoteRoot, RemoteError> {
    let (container_id, folder) = match spec {
        RootSpec::SharePoint {
            site_url,
            library,
            folder,
        } => (resolve_library(client, site_url, library).await?, folder),
        RootSpec::OneDrive { user, folder } => (resolve_user_drive(client, user).await?, folder),
    };

    let root_item_id = resolve_folder(client, &container_id, folder.as_deref()).await?;

    info!(
        drive = %container_id,
        root = %root_item_id,
        folder = folder.as_deref().unwrap_or("/"),
        "Resolved task root"
    );

    Ok(RemoteRoot {
        container_id,
        root_item_id,
    })
}

/// Splits a site URL into host name and server-relative path
///
/// `https://contoso.sharepoint.com/sites/Finance/` gives
/// `("contoso.sharepoint.com", "sites/Finance")`. The path is decoded so it
/// can be re-encoded segment by segment.
pub fn split_site_url(site_url: &str) -> Result<(String, String), RemoteError> {
    let url = url::Url::parse(site_url)
        .map_err(|e| RemoteError::InvalidResponse(format!("invalid site URL '{site_url}': {e}")))?;
    let host = url
        .host_str()
        .ok_or_else(|| RemoteError::InvalidResponse(format!("site URL has no host: {site_url}")))?
        .to_string();

    let segments = url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .map(|s| decode_segment(s).unwrap_or_else(|_| s.to_string()))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    Ok((host, segments.join("/")))
}

/// Resolves a SharePoint site URL and library name to a drive id
pub async fn resolve_library(
    client: &GraphClient,
    site_url: &str,
    library: &str,
) -> Result<DriveId, RemoteError> {
    let (host, site_path) = split_site_url(site_url)?;
    let site_lookup = GraphPath::new()
        .segment("sites")
        .segment(&host)
        .relative_path(&site_path);
    let site: GraphSite = client.get_json(&site_lookup).await?;
    debug!(site_url, site_id = %site.id, "Resolved site");

    let drives_path = GraphPath::new()
        .segment("sites")
        .segment(&site.id)
        .segment("drives");
    let mut page: GraphDriveList = client.get_json(&drives_path).await?;

    loop {
        if let Some(drive) = page.value.iter().find(|d| library_matches(d, library)) {
            return to_drive_id(&drive.id);
        }
        match page.next_link.take() {
            Some(next) => page = client.get_json_at(&next).await?,
            None => break,
        }
    }

    Err(RemoteError::NotFound(format!(
        "document library '{library}' on {site_url}"
    )))
}

/// A library matches by display name, or by the last segment of its URL
/// (`Shared Documents` for the library displayed as `Documents`).
fn library_matches(drive: &GraphDrive, library: &str) -> bool {
    if drive.name.eq_ignore_ascii_case(library) {
        return true;
    }
    drive
        .web_url
        .as_deref()
        .and_then(|u| u.trim_end_matches('/').rsplit('/').next())
        .and_then(|s| decode_segment(s).ok())
        .map_or(false, |s| s.eq_ignore_ascii_case(library))
}

/// Resolves a user's OneDrive to a drive id
pub async fn resolve_user_drive(client: &GraphClient, user: &str) -> Result<DriveId, RemoteError> {
    let path = GraphPath::new().segment("users").segment(user).segment("drive");
    let drive: GraphDrive = client.get_json(&path).await?;
    debug!(user, drive_id = %drive.id, "Resolved user drive");
    to_drive_id(&drive.id)
}

/// Resolves a folder inside a drive; `None` means the drive root
pub async fn resolve_folder(
    client: &GraphClient,
    drive: &DriveId,
    folder: Option<&str>,
) -> Result<ItemId, RemoteError> {
    let path = GraphPath::new()
        .segment("drives")
        .segment(drive.as_str())
        .segment("root")
        .relative_path(folder.unwrap_or_default());
    let item: GraphRootItem = client.get_json(&path).await?;

    if item.folder.is_none() {
        return Err(RemoteError::NotFound(format!(
            "'{}' is not a folder",
            folder.unwrap_or("/")
        )));
    }

    ItemId::new(item.id).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
}

fn to_drive_id(id: &str) -> Result<DriveId, RemoteError> {
    DriveId::new(id).map_err(|e| RemoteError::InvalidResponse(e.to_string()))
}
