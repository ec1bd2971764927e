//! Content-root discovery.
//!
//! An exported snapshot lives in a `.content.<id>` directory next to the
//! deployment root, where `<id>` is an alphanumeric tag chosen at export
//! time. Deployments may rename it and point `content_path` at the new
//! location instead.

use crate::Error;
use std::path::{Path, PathBuf};

fn is_content_dir(name: &str) -> bool {
    name.strip_prefix(".content.")
        .is_some_and(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Locate the content root under `root_dir`.
///
/// With an override the directory is used as-is (resolved under `root_dir`
/// when relative). Otherwise `root_dir` is scanned for a `.content.<id>`
/// directory; when several exist the lexicographically first wins, so
/// discovery is deterministic.
pub fn discover(root_dir: &Path, override_path: Option<&Path>) -> Result<PathBuf, Error> {
    if let Some(path) = override_path {
        let absolute = if path.is_absolute() { path.to_path_buf() } else { root_dir.join(path) };
        if absolute.is_dir() {
            return Ok(absolute);
        }
        return Err(Error::ContentRootMissing(format!("directory {} does not exist", absolute.display())));
    }

    let entries = std::fs::read_dir(root_dir)
        .map_err(|e| Error::ContentRootMissing(format!("cannot scan {}: {e}", root_dir.display())))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| is_content_dir(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::ContentRootMissing(format!("folder .content.<id> not found in {}", root_dir.display())))
}
