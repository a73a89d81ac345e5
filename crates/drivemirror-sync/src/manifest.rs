//! Append-only rename manifest
//!
//! Every sanitization and every preserve-rename adds one CSV row. The file is
//! opened for append per record and closed right after, so a killed run
//! leaves at most one partial row behind. The header row is written only
//! when the file is new or empty.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use drivemirror_core::domain::RenameManifestEntry;
use tracing::debug;

use crate::SyncError;

/// Handle to the manifest file
#[derive(Debug, Clone)]
pub struct RenameManifest {
    path: PathBuf,
}

impl RenameManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record
    pub fn append(&self, entry: &RenameManifestEntry) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let is_new = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        wtr.serialize(entry)?;
        wtr.flush()?;

        debug!(
            manifest = %self.path.display(),
            original = %entry.original_name,
            local = %entry.local_name,
            "manifest record appended"
        );
        Ok(())
    }
}
