//! Domain types
//!
//! This module contains the core domain types for DriveMirror:
//! - Newtypes for remote identifiers and page cursors
//! - Remote item metadata and content hashes
//! - Change-detection decisions and their reasons
//! - Update policy, result counters and rename manifest records
//! - Domain-specific error types

pub mod decision;
pub mod errors;
pub mod item;
pub mod manifest;
pub mod newtypes;
pub mod policy;
pub mod result;

// Re-export commonly used types
pub use decision::{Decision, ReplaceReason, SkipReason};
pub use errors::DomainError;
pub use item::{ContentHash, HashAlgorithm, ItemKind, RemoteItem};
pub use manifest::{RenameKind, RenameManifestEntry};
pub use newtypes::{DriveId, ItemId, PageCursor};
pub use policy::UpdatePolicy;
pub use result::{RunResult, TaskResult};
