//! Download module for content downloading.
//!
//! This module provides:
//! - Saving single media items to disk
//! - Sequential library walk with stop-on-first-duplicate
//! - Concurrent draining of a collected item list
//! - Download statistics

pub mod coordinator;
pub mod library;
pub mod media;
pub mod state;

pub use coordinator::{Coordinator, DEFAULT_WORKERS};
pub use library::{collect_all, download_all};
pub use media::{save_media_item, Downloader, MediaSaver, SaveOutcome};
pub use state::DownloadState;
