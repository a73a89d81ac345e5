//! Local naming rules
//!
//! Two kinds of local names differ from the remote one:
//!
//! - Sanitized names: characters that are invalid on common filesystems are
//!   replaced with `_`, and a short suffix derived from the remote item id is
//!   appended so two sanitized siblings cannot collide.
//!   `Report:Q1?.docx` becomes `Report_Q1_.docx_3F2504E0`.
//! - Preserved names: under the rename-new policy, the previous version of a
//!   file is moved to `{stem}_prev_{NNNNN}{ext}` before the new one lands.

use std::path::{Path, PathBuf};

use drivemirror_core::domain::RemoteItem;
use rand::Rng;

/// Characters replaced by `_` in local names
pub const INVALID_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Length of the id-derived suffix added to sanitized names
pub const ID_SUFFIX_LEN: usize = 8;

/// Suffix shown in dry-run output instead of a random number
pub const PREVIEW_SUFFIX: &str = "XXXXX";

const MAX_PRESERVE_ATTEMPTS: usize = 100;

/// Replaces every invalid character in `name` with `_`
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// The last [`ID_SUFFIX_LEN`] alphanumeric characters of `id`
pub fn id_suffix(id: &str) -> String {
    let alnum: Vec<char> = id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let start = alnum.len().saturating_sub(ID_SUFFIX_LEN);
    alnum[start..].iter().collect()
}

/// Local name for a remote item
///
/// Returns the name and whether it differs from the remote one.
pub fn local_name(item: &RemoteItem) -> (String, bool) {
    let sanitized = sanitize_name(&item.name);
    if sanitized == item.name {
        return (sanitized, false);
    }
    (format!("{sanitized}_{}", id_suffix(item.id.as_str())), true)
}

fn split_extension(name: &str) -> (&str, &str) {
    // A leading dot marks a hidden file, not an extension
    match name.rfind('.') {
        Some(pos) if pos > 0 => (&name[..pos], &name[pos..]),
        _ => (name, ""),
    }
}

/// `{stem}_prev_{suffix}{ext}`
pub fn preserved_name(name: &str, suffix: &str) -> String {
    let (stem, ext) = split_extension(name);
    format!("{stem}_prev_{suffix}{ext}")
}

fn random_suffix() -> String {
    rand::thread_rng().gen_range(10000..=99999).to_string()
}

/// Picks a free preserved path next to `target`
///
/// `exists` is consulted for every candidate. Returns `None` when no free
/// name was found.
pub fn unique_preserved_path<F>(target: &Path, mut exists: F) -> Option<PathBuf>
where
    F: FnMut(&Path) -> bool,
{
    let name = target.file_name()?.to_string_lossy().into_owned();
    let parent = target.parent().unwrap_or_else(|| Path::new(""));

    for _ in 0..MAX_PRESERVE_ATTEMPTS {
        let candidate = parent.join(preserved_name(&name, &random_suffix()));
        if !exists(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// The preserved path as described in dry-run output
pub fn preview_preserved_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(preserved_name(&name, PREVIEW_SUFFIX))
}
