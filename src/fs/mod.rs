//! Filesystem module.
//!
//! Provides:
//! - Filename validation
//! - Temporary download paths and cleanup

pub mod naming;
pub mod paths;

pub use naming::{is_partial_filename, partial_filename, sanitize_filename};
pub use paths::{ensure_dir, partial_path, remove_stale_partials};
