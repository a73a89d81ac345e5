//! Recursive tree walker
//!
//! Mirrors one remote folder into one local directory, depth-first. Each
//! folder owns its cursor loop over child pages; subfolders are walked to
//! completion before the next sibling is looked at, so at most one remote call
//! is ever in flight.
//!
//! A page that cannot be fetched (after retries) counts as one error and
//! abandons that folder's subtree. Siblings of the folder are unaffected.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use drivemirror_core::domain::{
    DriveId, ItemId, PageCursor, RemoteItem, RenameKind, RenameManifestEntry, TaskResult,
    UpdatePolicy,
};
use drivemirror_core::ports::ICloudProvider;
use tracing::{debug, error, info, instrument, warn};

use crate::applier::LocalUpdateApplier;
use crate::detector;
use crate::manifest::RenameManifest;
use crate::naming;
use crate::retry::RetryPolicy;

/// Walks remote folders for one task
pub struct TreeWalker<'a> {
    provider: &'a dyn ICloudProvider,
    retry: RetryPolicy,
    manifest: &'a RenameManifest,
    applier: LocalUpdateApplier<'a>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        provider: &'a dyn ICloudProvider,
        retry: RetryPolicy,
        manifest: &'a RenameManifest,
    ) -> Self {
        Self {
            provider,
            retry,
            manifest,
            applier: LocalUpdateApplier::new(provider, retry, manifest),
        }
    }

    /// Mirrors `root_item_id` and everything below it into `local_base`
    #[instrument(skip(self, local_base), fields(local_base = %local_base.display()))]
    pub async fn walk(
        &self,
        container_id: &DriveId,
        root_item_id: &ItemId,
        local_base: &Path,
        policy: UpdatePolicy,
        dry_run: bool,
    ) -> TaskResult {
        self.walk_folder(container_id, root_item_id, local_base, policy, dry_run)
            .await
    }

    fn walk_folder<'b>(
        &'b self,
        container_id: &'b DriveId,
        folder_id: &'b ItemId,
        local_dir: &'b Path,
        policy: UpdatePolicy,
        dry_run: bool,
    ) -> Pin<Box<dyn Future<Output = TaskResult> + Send + 'b>> {
        Box::pin(async move {
            let mut result = TaskResult::default();
            let mut cursor: Option<PageCursor> = None;
            let mut page_number: u32 = 0;

            loop {
                page_number += 1;
                let page = match self
                    .retry
                    .execute("list_children", || {
                        self.provider
                            .list_children(container_id, folder_id, cursor.as_ref())
                    })
                    .await
                {
                    Ok(page) => page,
                    Err(e) => {
                        error!(
                            event = "error",
                            name = %local_dir.file_name().unwrap_or_default().to_string_lossy(),
                            folder = %local_dir.display(),
                            item_id = %folder_id,
                            page = page_number,
                            error = %e,
                            "Failed to list folder, abandoning subtree"
                        );
                        result.record_error();
                        return result;
                    }
                };

                debug!(
                    folder = %local_dir.display(),
                    page = page_number,
                    items = page.items.len(),
                    "Listed page"
                );

                for item in &page.items {
                    self.visit(item, container_id, local_dir, policy, dry_run, &mut result)
                        .await;
                }

                match page.next_cursor {
                    Some(next) => cursor = Some(next),
                    None => break,
                }
            }

            result
        })
    }

    async fn visit(
        &self,
        item: &RemoteItem,
        container_id: &DriveId,
        local_dir: &Path,
        policy: UpdatePolicy,
        dry_run: bool,
        result: &mut TaskResult,
    ) {
        if item.is_package {
            warn!(
                event = "skip",
                name = %item.name,
                item_id = %item.id,
                "Package item cannot be downloaded, skipping"
            );
            result.record_skip();
            return;
        }

        let (name, sanitized) = naming::local_name(item);
        if sanitized {
            info!(original = %item.name, local = %name, "Sanitized item name");
            if !dry_run {
                let entry = RenameManifestEntry::new(
                    RenameKind::Sanitized,
                    item.name.clone(),
                    name.clone(),
                    item.id.clone(),
                    container_id.clone(),
                );
                if let Err(e) = self.manifest.append(&entry) {
                    warn!(manifest = %self.manifest.path().display(), error = %e, "Failed to record rename");
                }
            }
        }

        let path = local_dir.join(&name);

        if item.is_folder() {
            if !dry_run {
                if let Err(e) = tokio::fs::create_dir_all(&path).await {
                    error!(
                        event = "error",
                        name = %item.name,
                        item_id = %item.id,
                        path = %path.display(),
                        error = %e,
                        "Failed to create local folder"
                    );
                    result.record_error();
                    return;
                }
            }
            *result += self
                .walk_folder(container_id, &item.id, &path, policy, dry_run)
                .await;
            return;
        }

        let decision = match detector::decide(item, &path).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(
                    event = "error",
                    name = %item.name,
                    item_id = %item.id,
                    path = %path.display(),
                    error = %e,
                    "Failed to inspect local file"
                );
                result.record_error();
                return;
            }
        };

        self.applier
            .apply(decision, item, container_id, &path, policy, dry_run, result)
            .await;
    }
}
