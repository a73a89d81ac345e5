//! Local file state
//!
//! [`LocalFileRecord`] captures what the change-detector needs to know about
//! the file at a target path. The content digest is computed on request.

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use drivemirror_core::domain::HashAlgorithm;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

const READ_CHUNK: usize = 64 * 1024;

/// Size and last-write time of an existing local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified_utc: DateTime<Utc>,
}

impl LocalFileRecord {
    /// Stats `path`
    ///
    /// Returns `Ok(None)` when nothing exists there. A directory at the
    /// path is reported as an error, since a file cannot be written over it.
    #[instrument(level = "debug", skip(path), fields(path = %path.display()))]
    pub async fn probe(path: &Path) -> std::io::Result<Option<Self>> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no local file");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if metadata.is_dir() {
            return Err(std::io::Error::new(
                ErrorKind::Other,
                format!("{} is a directory", path.display()),
            ));
        }

        let modified_utc = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| DateTime::<Utc>::from(SystemTime::UNIX_EPOCH));

        Ok(Some(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified_utc,
        }))
    }

    /// Computes the lowercase hex digest of the file with `algorithm`
    pub async fn content_hash(&self, algorithm: HashAlgorithm) -> std::io::Result<String> {
        let path = self.path.clone();
        let hex = tokio::task::spawn_blocking(move || match algorithm {
            HashAlgorithm::Sha256 => digest_file::<Sha256>(&path),
            HashAlgorithm::Sha1 => digest_file::<Sha1>(&path),
        })
        .await
        .map_err(|e| std::io::Error::new(ErrorKind::Other, e))??;

        debug!(path = %self.path.display(), %algorithm, hash = %hex, "local hash computed");
        Ok(hex)
    }
}

fn digest_file<D: Digest>(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = D::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}

/// Sets the last-write time of `path`
pub async fn set_modified(path: &Path, modified: DateTime<Utc>) -> std::io::Result<()> {
    let path = path.to_path_buf();
    let time = SystemTime::from(modified);
    tokio::task::spawn_blocking(move || {
        let file = std::fs::OpenOptions::new().write(true).open(&path)?;
        file.set_modified(time)
    })
    .await
    .map_err(|e| std::io::Error::new(ErrorKind::Other, e))?
}
