//! Update policy for locally modified targets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// How an existing local file is treated when the remote copy has changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdatePolicy {
    /// Replace the local file in place
    Overwrite,
    /// Move the local file aside under a `_prev_NNNNN` name, then download
    #[default]
    RenameNew,
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "Overwrite"),
            Self::RenameNew => write!(f, "RenameNew"),
        }
    }
}

impl FromStr for UpdatePolicy {
    type Err = DomainError;

    /// Accepts the canonical names case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "renamenew" | "rename_new" | "rename-new" => Ok(Self::RenameNew),
            _ => Err(DomainError::InvalidUpdatePolicy(s.to_string())),
        }
    }
}
