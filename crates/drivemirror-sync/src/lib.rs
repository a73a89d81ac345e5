//! DriveMirror Sync - Incremental one-way mirroring engine
//!
//! Provides:
//! - Retry with linear backoff for transient remote failures
//! - Change detection over three fidelity levels of remote metadata
//! - Safe local updates (atomic replace or preserve-and-rename)
//! - Depth-first traversal of paginated remote folders
//! - Per-task isolation and run-wide result accounting
//!
//! ## Modules
//!
//! - [`retry`] - Transient-fault retry wrapper
//! - [`local`] - Local file probing, hashing and timestamps
//! - [`detector`] - Change-detector producing a [`Decision`](drivemirror_core::domain::Decision)
//! - [`naming`] - Name sanitization and preserved-name generation
//! - [`manifest`] - Append-only CSV rename manifest
//! - [`applier`] - Local-update applier
//! - [`walker`] - Recursive tree walker
//! - [`runner`] - Task runner

pub mod applier;
pub mod detector;
pub mod local;
pub mod manifest;
pub mod naming;
pub mod retry;
pub mod runner;
pub mod walker;

use std::path::PathBuf;

use drivemirror_core::ports::RemoteError;
use thiserror::Error;

pub use runner::TaskRunner;

/// Errors that can occur while applying a single item
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error occurred during file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A remote call failed (after retries, where applicable)
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// No free preserved name could be found next to the target
    #[error("No free preserved name for {0}")]
    NameExhausted(PathBuf),

    /// The manifest could not be written
    #[error("Manifest error: {0}")]
    Manifest(#[from] csv::Error),
}
