//! GraphCloudProvider - ICloudProvider implementation for Microsoft Graph API
//!
//! Wraps the [`GraphClient`] and delegates to the children, download and
//! resolve modules to fulfil the [`ICloudProvider`] port contract.
//!
//! ## Design Notes
//!
//! - The access token is fixed for the lifetime of the provider; a run
//!   acquires one token up front.
//! - No retries happen here. The sync engine wraps each call in its own
//!   retry policy.

use std::path::Path;

use drivemirror_core::domain::{DriveId, ItemId, PageCursor};
use drivemirror_core::ports::{ChildrenPage, ICloudProvider, RemoteError, RemoteRoot, RootSpec};

use crate::client::GraphClient;
use crate::{children, download, resolve};

/// Microsoft Graph implementation of [`ICloudProvider`]
#[derive(Debug, Clone)]
pub struct GraphCloudProvider {
    client: GraphClient,
}

impl GraphCloudProvider {
    /// Creates a new provider with the given GraphClient
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying GraphClient
    pub fn client(&self) -> &GraphClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl ICloudProvider for GraphCloudProvider {
    async fn resolve_root(&self, spec: &RootSpec) -> Result<RemoteRoot, RemoteError> {
        resolve::resolve_root(&self.client, spec).await
    }

    async fn list_children(
        &self,
        container_id: &DriveId,
        item_id: &ItemId,
        cursor: Option<&PageCursor>,
    ) -> Result<ChildrenPage, RemoteError> {
        children::list_children(&self.client, container_id, item_id, cursor).await
    }

    async fn download_to(
        &self,
        container_id: &DriveId,
        item_id: &ItemId,
        destination: &Path,
    ) -> Result<(), RemoteError> {
        download::download_to(&self.client, container_id, item_id, destination).await
    }
}
