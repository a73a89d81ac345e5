//! Local-update applier
//!
//! Turns a [`Decision`] into filesystem changes and counts the outcome.
//! Every mutation is complete-or-not on its own: downloads land through a
//! temporary file renamed into place by the provider, and preserve-renames
//! are a single `rename(2)`.
//!
//! Under [`UpdatePolicy::RenameNew`] the existing file is moved to a
//! `_prev_NNNNN` sibling before the replacement is fetched; it is never
//! deleted.

use std::path::Path;

use drivemirror_core::domain::{
    Decision, DriveId, RemoteItem, RenameKind, RenameManifestEntry, TaskResult, UpdatePolicy,
};
use drivemirror_core::ports::ICloudProvider;
use tracing::{info, warn};

use crate::local;
use crate::manifest::RenameManifest;
use crate::naming;
use crate::retry::RetryPolicy;
use crate::SyncError;

/// Applies decisions for one task
pub struct LocalUpdateApplier<'a> {
    provider: &'a dyn ICloudProvider,
    retry: RetryPolicy,
    manifest: &'a RenameManifest,
}

impl<'a> LocalUpdateApplier<'a> {
    pub fn new(
        provider: &'a dyn ICloudProvider,
        retry: RetryPolicy,
        manifest: &'a RenameManifest,
    ) -> Self {
        Self {
            provider,
            retry,
            manifest,
        }
    }

    /// Applies `decision` for `item` at `target` and records the outcome
    ///
    /// Failures are logged and counted; they never propagate, so the caller
    /// carries on with the next sibling.
    #[allow(clippy::too_many_arguments)]
    pub async fn apply(
        &self,
        decision: Decision,
        item: &RemoteItem,
        container_id: &DriveId,
        target: &Path,
        policy: UpdatePolicy,
        dry_run: bool,
        result: &mut TaskResult,
    ) {
        match self
            .apply_inner(decision, item, container_id, target, policy, dry_run)
            .await
        {
            Ok(true) => result.record_download(),
            Ok(false) => result.record_skip(),
            Err(e) => {
                warn!(
                    event = "error",
                    name = %item.name,
                    path = %target.display(),
                    item_id = %item.id,
                    error = %e,
                    "Failed to update local file"
                );
                result.record_error();
            }
        }
    }

    /// Returns whether the item counts as downloaded
    async fn apply_inner(
        &self,
        decision: Decision,
        item: &RemoteItem,
        container_id: &DriveId,
        target: &Path,
        policy: UpdatePolicy,
        dry_run: bool,
    ) -> Result<bool, SyncError> {
        match decision {
            Decision::Skip { reason } => {
                info!(event = "skip", path = %target.display(), %reason, "Up to date");
                return Ok(false);
            }
            Decision::DownloadNew => {}
            Decision::DownloadReplace { reason } => {
                info!(path = %target.display(), %reason, %policy, "Local file is stale");
                if policy == UpdatePolicy::RenameNew {
                    self.preserve(item, container_id, target, dry_run).await?;
                }
            }
        }

        self.download(item, container_id, target, dry_run).await?;
        Ok(true)
    }

    /// Moves the current file at `target` to a free `_prev_` sibling
    async fn preserve(
        &self,
        item: &RemoteItem,
        container_id: &DriveId,
        target: &Path,
        dry_run: bool,
    ) -> Result<(), SyncError> {
        if dry_run {
            info!(
                dry_run = true,
                from = %target.display(),
                to = %naming::preview_preserved_path(target).display(),
                "Would preserve previous version"
            );
            return Ok(());
        }

        let preserved = naming::unique_preserved_path(target, |p| p.exists())
            .ok_or_else(|| SyncError::NameExhausted(target.to_path_buf()))?;
        tokio::fs::rename(target, &preserved).await?;

        let original_name = file_name(target);
        let preserved_name = file_name(&preserved);
        info!(
            from = %target.display(),
            to = %preserved.display(),
            "Preserved previous version"
        );

        let entry = RenameManifestEntry::new(
            RenameKind::Preserved,
            original_name,
            preserved_name,
            item.id.clone(),
            container_id.clone(),
        );
        if let Err(e) = self.manifest.append(&entry) {
            warn!(manifest = %self.manifest.path().display(), error = %e, "Failed to record rename");
        }
        Ok(())
    }

    async fn download(
        &self,
        item: &RemoteItem,
        container_id: &DriveId,
        target: &Path,
        dry_run: bool,
    ) -> Result<(), SyncError> {
        if dry_run {
            info!(event = "download", dry_run = true, path = %target.display(), "Would download");
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.retry
            .execute("download", || {
                self.provider.download_to(container_id, &item.id, target)
            })
            .await?;

        if let Some(modified) = item.last_modified_utc {
            local::set_modified(target, modified).await?;
        }

        info!(
            event = "download",
            path = %target.display(),
            size = item.size,
            "Downloaded"
        );
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
