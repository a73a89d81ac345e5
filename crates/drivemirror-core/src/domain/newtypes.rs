//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for remote identifiers. Each newtype ensures the
//! value is usable as a single URL path segment at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

fn check_remote_id(kind: &str, id: &str) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::InvalidRemoteId(format!(
            "{kind} cannot be empty"
        )));
    }
    if id.chars().any(|c| c == '/' || c.is_control() || c.is_whitespace()) {
        return Err(DomainError::InvalidRemoteId(format!(
            "{kind} contains invalid characters: {id}"
        )));
    }
    Ok(())
}

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier
            ///
            /// # Errors
            /// Returns error if the identifier is empty or contains `/`,
            /// whitespace or control characters
            pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
                let id = id.into();
                check_remote_id($kind, &id)?;
                Ok(Self(id))
            }

            /// Get the inner string reference
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

remote_id!(
    /// Identifier of a remote container (a Graph drive / document library)
    DriveId,
    "Drive ID"
);

remote_id!(
    /// Identifier of an item inside a remote container
    ItemId,
    "Item ID"
);

/// Opaque continuation cursor for a paginated child listing
///
/// For the Graph adapter this is the absolute `@odata.nextLink` URL; the
/// engine never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(cursor: impl Into<String>) -> Self {
        Self(cursor.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PageCursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
