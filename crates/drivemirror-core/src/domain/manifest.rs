//! Rename manifest records
//!
//! One record is appended each time a local name differs from the remote one,
//! either because the remote name was sanitized or because a previous version
//! was moved aside. Records are never rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::{DriveId, ItemId};

/// What caused the local name to differ from the remote name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameKind {
    Sanitized,
    Preserved,
}

/// A single manifest row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameManifestEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: RenameKind,
    pub original_name: String,
    pub local_name: String,
    pub remote_item_id: ItemId,
    pub container_id: DriveId,
}

impl RenameManifestEntry {
    pub fn new(
        kind: RenameKind,
        original_name: impl Into<String>,
        local_name: impl Into<String>,
        remote_item_id: ItemId,
        container_id: DriveId,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            original_name: original_name.into(),
            local_name: local_name.into(),
            remote_item_id,
            container_id,
        }
    }
}
