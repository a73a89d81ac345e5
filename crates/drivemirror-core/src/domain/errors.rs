//! Domain error types
//!
//! Errors raised while constructing or validating domain values, such as
//! identifiers, update policies and task definitions.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Remote identifier was empty or malformed
    #[error("Invalid remote ID: {0}")]
    InvalidRemoteId(String),

    /// Content hash was not a hex digest of the expected length
    #[error("Invalid hash format: {0}")]
    InvalidHash(String),

    /// Unknown update policy name
    #[error("Invalid update action: {0} (expected Overwrite or RenameNew)")]
    InvalidUpdatePolicy(String),

    /// Unknown task type
    #[error("Invalid task type: {0} (expected SharePoint or OneDrive)")]
    InvalidTaskKind(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
