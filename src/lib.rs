//! Photos Backup - mirror a Google Photos library to a local directory
//!
//! This library provides functionality for backing up every photo and video
//! of a Google Photos library.
//!
//! # Features
//!
//! - OAuth refresh-token flow with cached, auto-refreshed access tokens
//! - Cursor-based paging through the media item listing
//! - Sequential download that stops at the first item already on disk
//! - Concurrent download with a fixed pool of workers
//! - Deterministic file names and atomic writes
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use photos_backup::{download_all, Config, Downloader, PhotosApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let api = Arc::new(PhotosApi::from_config(&config)?);
//!     let downloader = Downloader::new(Arc::clone(&api));
//!
//!     let state = download_all(&api, &downloader, Path::new("backup"), 100, false).await?;
//!     println!("{} items downloaded", state.total_downloaded());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{PhotosApi, TokenManager};
pub use config::{Config, DownloadStrategy, RunMode};
pub use download::{collect_all, download_all, Coordinator, DownloadState, Downloader, SaveOutcome};
pub use error::{Error, Result};
pub use media::{MediaItem, MediaType};
