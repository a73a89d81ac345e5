//! Remote store port (driven/secondary port)
//!
//! This module defines the interface the sync engine uses to read a remote
//! hierarchical file store. The primary implementation targets SharePoint
//! document libraries and OneDrive drives via the Microsoft Graph API.
//!
//! ## Design Notes
//!
//! - Every method fails with [`RemoteError`], a closed classification of
//!   remote failures. Adapters normalize transport errors into it so callers
//!   can decide about retries by matching a single variant.
//! - All operations are read-only. The engine never writes to the remote store.
//! - Uses `#[async_trait]` for async trait methods.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::domain::item::RemoteItem;
use crate::domain::newtypes::{DriveId, ItemId, PageCursor};

// ============================================================================
// RemoteError
// ============================================================================

/// Normalized remote failure
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Rate limiting or a temporarily unavailable service (429, 503, 504)
    #[error("Transient failure (HTTP {status}), retry after {retry_after:?}")]
    Transient {
        status: u16,
        retry_after: Option<Duration>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Credentials could not be obtained
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local I/O failure while storing fetched content
    #[error("Local I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemoteError {
    /// Classify an HTTP error status
    ///
    /// 429, 503 and 504 become [`RemoteError::Transient`]; 404 becomes
    /// [`RemoteError::NotFound`]; 401 and 403 become
    /// [`RemoteError::AccessDenied`]; everything else is [`RemoteError::Http`].
    pub fn from_status(status: u16, retry_after: Option<Duration>, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 | 503 | 504 => Self::Transient {
                status,
                retry_after,
            },
            404 => Self::NotFound(message),
            401 | 403 => Self::AccessDenied(message),
            _ => Self::Http { status, message },
        }
    }

    /// Whether the retry wrapper may try the operation again
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// Server-provided wait hint, if any
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Transient { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

// ============================================================================
// Port DTOs
// ============================================================================

/// One page of a child listing
#[derive(Debug, Clone, Default)]
pub struct ChildrenPage {
    pub items: Vec<RemoteItem>,
    /// Present when more pages follow
    pub next_cursor: Option<PageCursor>,
}

/// The resolved starting point of a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRoot {
    pub container_id: DriveId,
    pub root_item_id: ItemId,
}

/// A validated description of where a task's remote tree lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSpec {
    /// A SharePoint document library, optionally narrowed to a sub-folder
    SharePoint {
        site_url: String,
        library: String,
        folder: Option<String>,
    },
    /// A user's OneDrive, optionally narrowed to a sub-folder
    OneDrive {
        user: String,
        folder: Option<String>,
    },
}

// ============================================================================
// ICloudProvider trait
// ============================================================================

/// Port trait for read-only remote store operations
///
/// ## Implementation Notes
///
/// - Implementations must not retry internally; the engine wraps every call
///   in its own retry policy and relies on [`RemoteError::Transient`] to
///   recognize retryable failures.
/// - `download_to` must leave `destination` either untouched or holding the
///   complete content. Writing to a temporary sibling and renaming it into
///   place satisfies this.
#[async_trait::async_trait]
pub trait ICloudProvider: Send + Sync {
    /// Resolves a task description into a container and its root folder
    ///
    /// Fails with [`RemoteError::NotFound`] or [`RemoteError::AccessDenied`]
    /// when the site, library, user or folder cannot be reached.
    async fn resolve_root(&self, spec: &RootSpec) -> Result<RemoteRoot, RemoteError>;

    /// Lists one page of a folder's children
    ///
    /// # Arguments
    /// * `container_id` - The drive owning the folder
    /// * `item_id` - The folder to list
    /// * `cursor` - Continuation cursor from the previous page (None for the first page)
    async fn list_children(
        &self,
        container_id: &DriveId,
        item_id: &ItemId,
        cursor: Option<&PageCursor>,
    ) -> Result<ChildrenPage, RemoteError>;

    /// Fetches a file's content into `destination`
    async fn download_to(
        &self,
        container_id: &DriveId,
        item_id: &ItemId,
        destination: &Path,
    ) -> Result<(), RemoteError>;
}
