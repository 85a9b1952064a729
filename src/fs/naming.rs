//! Filename validation and temporary download names.

use uuid::Uuid;

use crate::error::{Error, Result};

/// Suffix of in-progress downloads.
pub const PARTIAL_SUFFIX: &str = ".part";

/// Validate a filename built from server data.
///
/// Names that could escape the target directory are rejected; characters
/// that are invalid on common filesystems are replaced with `_`. The
/// replacement is lossy (`a*b` and `a?b` both become `a_b`); callers that
/// need distinct names must compare the result with their input.
pub fn sanitize_filename(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.starts_with('.') {
        return Err(Error::InvalidFilename(format!(
            "Filename cannot be empty or hidden: '{}'",
            name
        )));
    }

    Ok(sanitized)
}

/// Hidden, unique name used while `final_name` is being downloaded.
pub fn partial_filename(final_name: &str) -> String {
    format!(".{}.{}{}", final_name, Uuid::new_v4().simple(), PARTIAL_SUFFIX)
}

/// Whether a directory entry is a leftover in-progress download.
///
/// Only the exact shape produced by [`partial_filename`] matches:
/// `.<name>.<32 hex digits>.part`.
pub fn is_partial_filename(name: &str) -> bool {
    let Some(inner) = name
        .strip_prefix('.')
        .and_then(|n| n.strip_suffix(PARTIAL_SUFFIX))
    else {
        return false;
    };

    match inner.rsplit_once('.') {
        Some((final_name, id)) => {
            !final_name.is_empty() && id.len() == 32 && Uuid::try_parse(id).is_ok()
        }
        None => false,
    }
}
