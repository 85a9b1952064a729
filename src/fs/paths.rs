//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::{is_partial_filename, partial_filename};

/// Ensure a directory exists, creating it if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Temporary sibling path for a download whose final path is `target`.
///
/// Living in the same directory keeps the final rename on one filesystem.
pub fn partial_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(partial_filename(&name))
}

/// Remove in-progress files left behind by an interrupted run.
///
/// Returns the number of files removed. A missing directory is not an error.
pub async fn remove_stale_partials(dir: &Path) -> Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if !is_partial_filename(&name.to_string_lossy()) {
            continue;
        }
        if entry.file_type().await?.is_file() {
            tracing::debug!("Removing stale partial download: {}", entry.path().display());
            tokio::fs::remove_file(entry.path()).await?;
            removed += 1;
        }
    }

    Ok(removed)
}
