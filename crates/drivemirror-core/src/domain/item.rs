//! Remote item metadata
//!
//! [`RemoteItem`] is the engine's view of one child returned by a listing call.
//! It carries exactly the fields the change-detector needs, and nothing that
//! would require a second round-trip to the remote store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::ItemId;

// ============================================================================
// Content hashes
// ============================================================================

/// Strong content hash algorithms the engine can reproduce locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Sha256,
    Sha1,
}

impl HashAlgorithm {
    /// Length of the hex-encoded digest
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha1 => 40,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "SHA-256"),
            Self::Sha1 => write!(f, "SHA-1"),
        }
    }
}

/// A remote content hash tagged with its algorithm
///
/// The digest is stored lowercase; remote services report it in either case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    algorithm: HashAlgorithm,
    hex: String,
}

impl ContentHash {
    /// Create a hash from a hex digest
    ///
    /// # Errors
    /// Returns error if the digest is not hex or has the wrong length
    pub fn new(algorithm: HashAlgorithm, hex: &str) -> Result<Self, DomainError> {
        let hex = hex.trim().to_ascii_lowercase();
        if hex.len() != algorithm.hex_len() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidHash(format!("{algorithm}: {hex}")));
        }
        Ok(Self { algorithm, hex })
    }

    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    #[must_use]
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Case-insensitive comparison against a locally computed digest
    #[must_use]
    pub fn matches(&self, local_hex: &str) -> bool {
        self.hex.eq_ignore_ascii_case(local_hex.trim())
    }
}

// ============================================================================
// RemoteItem
// ============================================================================

/// Whether a remote item is a folder or a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Folder,
    File,
}

/// Metadata for a single child of a remote folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Package items (OneNote notebooks and similar) have no downloadable content
    pub is_package: bool,
    pub size: Option<u64>,
    pub last_modified_utc: Option<DateTime<Utc>>,
    pub hash: Option<ContentHash>,
}

impl RemoteItem {
    /// Create a file item with no optional metadata
    pub fn file(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: ItemKind::File,
            is_package: false,
            size: None,
            last_modified_utc: None,
            hash: None,
        }
    }

    /// Create a folder item
    pub fn folder(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Folder,
            ..Self::file(id, name)
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.last_modified_utc = Some(modified);
        self
    }

    #[must_use]
    pub fn with_hash(mut self, hash: ContentHash) -> Self {
        self.hash = Some(hash);
        self
    }

    #[must_use]
    pub fn as_package(mut self) -> Self {
        self.is_package = true;
        self
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == ItemKind::Folder
    }
}
