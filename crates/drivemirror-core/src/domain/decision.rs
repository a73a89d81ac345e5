//! Change-detection outcomes
//!
//! A [`Decision`] is derived from one remote file and the current state of its
//! local counterpart. Decisions are never persisted; the reasons exist so that
//! every skip and every replacement can be explained in the run log.

use std::fmt;

use chrono::{DateTime, Utc};

use super::item::HashAlgorithm;

/// Why an existing local file was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Local digest equals the remote strong hash
    HashMatch(HashAlgorithm),
    /// Size equal and timestamps within tolerance
    SizeAndTimestampMatch,
    /// Only size was available and it matched
    SizeMatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashMatch(algorithm) => write!(f, "{algorithm} hash match"),
            Self::SizeAndTimestampMatch => write!(f, "size and timestamp match"),
            Self::SizeMatch => write!(f, "size match (no hash or timestamp available)"),
        }
    }
}

/// Why an existing local file must be replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceReason {
    HashMismatch(HashAlgorithm),
    SizeMismatch {
        local: u64,
        remote: u64,
    },
    TimestampMismatch {
        local: DateTime<Utc>,
        remote: DateTime<Utc>,
    },
    /// The remote item carries neither a strong hash nor a size
    NoComparableMetadata,
}

impl fmt::Display for ReplaceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashMismatch(algorithm) => write!(f, "{algorithm} hash mismatch"),
            Self::SizeMismatch { local, remote } => {
                write!(f, "size mismatch (local {local} B, remote {remote} B)")
            }
            Self::TimestampMismatch { local, remote } => write!(
                f,
                "timestamp mismatch (local {}, remote {})",
                local.to_rfc3339(),
                remote.to_rfc3339()
            ),
            Self::NoComparableMetadata => write!(f, "no comparable remote metadata"),
        }
    }
}

/// What to do with one remote file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Skip { reason: SkipReason },
    DownloadNew,
    DownloadReplace { reason: ReplaceReason },
}

impl Decision {
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip { reason } => write!(f, "skip ({reason})"),
            Self::DownloadNew => write!(f, "download (new)"),
            Self::DownloadReplace { reason } => write!(f, "replace ({reason})"),
        }
    }
}
