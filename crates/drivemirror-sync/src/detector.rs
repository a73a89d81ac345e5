//! Change-detector
//!
//! Compares one remote file against its local counterpart using the strongest
//! evidence the remote listing provides:
//!
//! 1. No local file: download.
//! 2. Remote strong hash: hash the local file with the same algorithm.
//! 3. Remote size and timestamp: exact size, timestamps within 2 s.
//! 4. Remote size only: exact size.
//!
//! A weaker tier is consulted only when the remote field required by the
//! stronger tier is absent. A hash mismatch is never overruled by a size or
//! timestamp match.

use std::path::Path;

use chrono::{DateTime, Utc};
use drivemirror_core::domain::{Decision, RemoteItem, ReplaceReason, SkipReason};
use tracing::debug;

use crate::local::LocalFileRecord;

/// Maximum clock skew tolerated between local and remote timestamps
pub const TIMESTAMP_TOLERANCE_MS: i64 = 2000;

/// Decides what to do with `remote` given the file at `local_path`
pub async fn decide(remote: &RemoteItem, local_path: &Path) -> std::io::Result<Decision> {
    let Some(local) = LocalFileRecord::probe(local_path).await? else {
        return Ok(Decision::DownloadNew);
    };

    let decision = match &remote.hash {
        Some(hash) => {
            let local_hex = local.content_hash(hash.algorithm()).await?;
            if hash.matches(&local_hex) {
                Decision::Skip {
                    reason: SkipReason::HashMatch(hash.algorithm()),
                }
            } else {
                Decision::DownloadReplace {
                    reason: ReplaceReason::HashMismatch(hash.algorithm()),
                }
            }
        }
        None => compare_metadata(remote.size, remote.last_modified_utc, &local),
    };

    debug!(name = %remote.name, %decision, "change detected");
    Ok(decision)
}

/// Size/timestamp tiers, used when the remote item has no strong hash
pub fn compare_metadata(
    remote_size: Option<u64>,
    remote_modified: Option<DateTime<Utc>>,
    local: &LocalFileRecord,
) -> Decision {
    let Some(remote_size) = remote_size else {
        return Decision::DownloadReplace {
            reason: ReplaceReason::NoComparableMetadata,
        };
    };

    if remote_size != local.size {
        return Decision::DownloadReplace {
            reason: ReplaceReason::SizeMismatch {
                local: local.size,
                remote: remote_size,
            },
        };
    }

    match remote_modified {
        Some(remote_modified) => {
            let delta = (local.modified_utc - remote_modified).num_milliseconds().abs();
            if delta < TIMESTAMP_TOLERANCE_MS {
                Decision::Skip {
                    reason: SkipReason::SizeAndTimestampMatch,
                }
            } else {
                Decision::DownloadReplace {
                    reason: ReplaceReason::TimestampMismatch {
                        local: local.modified_utc,
                        remote: remote_modified,
                    },
                }
            }
        }
        None => Decision::Skip {
            reason: SkipReason::SizeMatch,
        },
    }
}
