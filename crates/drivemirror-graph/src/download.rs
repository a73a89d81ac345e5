//! Streamed content download
//!
//! `GET /drives/{drive-id}/items/{item-id}/content` answers with a redirect to
//! a pre-authenticated URL, which reqwest follows. The body is streamed into a
//! hidden sibling of the destination and renamed over it once complete, so the
//! destination only ever holds the old content or the full new content.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Method;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use drivemirror_core::domain::{DriveId, ItemId};
use drivemirror_core::ports::RemoteError;

use crate::client::{network_error, GraphClient};
use crate::paths::GraphPath;

/// Suffix of in-flight download files
const PARTIAL_SUFFIX: &str = ".partial";

/// Path of the content endpoint for an item
pub fn content_path(drive: &DriveId, item: &ItemId) -> GraphPath {
    GraphPath::new()
        .segment("drives")
        .segment(drive.as_str())
        .segment("items")
        .segment(item.as_str())
        .segment("content")
}

/// Temporary sibling used while streaming: `dir/.name.partial`
pub fn partial_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{name}{PARTIAL_SUFFIX}"))
}

/// Downloads an item's content to `destination`
///
/// The parent directory must exist. An existing file at `destination` is
/// replaced atomically.
pub async fn download_to(
    client: &GraphClient,
    drive: &DriveId,
    item: &ItemId,
    destination: &Path,
) -> Result<(), RemoteError> {
    let path = content_path(drive, item);
    let response = client
        .send(client.request(Method::GET, path.as_str()))
        .await?;

    let partial = partial_path(destination);
    let written = match stream_to_file(response, &partial).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = fs::remove_file(&partial).await;
            return Err(e);
        }
    };

    if let Err(e) = fs::rename(&partial, destination).await {
        let _ = fs::remove_file(&partial).await;
        return Err(RemoteError::Io(e));
    }

    debug!(item = %item, bytes = written, path = %destination.display(), "Download complete");
    Ok(())
}

async fn stream_to_file(response: reqwest::Response, partial: &Path) -> Result<u64, RemoteError> {
    let mut file = fs::File::create(partial).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(network_error)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}
