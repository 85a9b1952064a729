//! Media file downloading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::Response;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::PhotosApi;
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, partial_path};
use crate::media::MediaItem;
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Result of a save that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The payload was written to this path.
    Saved(PathBuf),
    /// A file with the item's name already existed and was left untouched.
    AlreadyDownloaded(PathBuf),
}

/// Persists one media item into a directory.
#[async_trait]
pub trait MediaSaver: Send + Sync {
    async fn save(&self, item: &MediaItem, directory: &Path, force_update: bool)
        -> Result<SaveOutcome>;
}

/// Saves media items by downloading them through the API client.
pub struct Downloader {
    api: Arc<PhotosApi>,
    show_downloads: bool,
    show_progress: bool,
}

impl Downloader {
    pub fn new(api: Arc<PhotosApi>) -> Self {
        Self {
            api,
            show_downloads: true,
            show_progress: false,
        }
    }

    /// Log every saved file at info level.
    pub fn show_downloads(mut self, show: bool) -> Self {
        self.show_downloads = show;
        self
    }

    /// Show a byte progress bar for large files.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

#[async_trait]
impl MediaSaver for Downloader {
    async fn save(
        &self,
        item: &MediaItem,
        directory: &Path,
        force_update: bool,
    ) -> Result<SaveOutcome> {
        let outcome = save_media_item(&self.api, item, directory, force_update, self.show_progress)
            .await?;

        if let SaveOutcome::Saved(path) = &outcome {
            if self.show_downloads {
                tracing::info!("Downloaded: {}", path.display());
            } else {
                tracing::debug!("Downloaded: {}", path.display());
            }
        }

        Ok(outcome)
    }
}

/// Download a media item into `directory`.
///
/// Unless `force_update` is set, an existing file with the item's name is
/// reported as [`SaveOutcome::AlreadyDownloaded`] and nothing is fetched.
pub async fn save_media_item(
    api: &PhotosApi,
    item: &MediaItem,
    directory: &Path,
    force_update: bool,
    show_progress: bool,
) -> Result<SaveOutcome> {
    let filename = item.local_filename()?;
    let output_path = directory.join(&filename);

    if !force_update && tokio::fs::try_exists(&output_path).await? {
        return Ok(SaveOutcome::AlreadyDownloaded(output_path));
    }

    let url = item.download_url()?;

    ensure_dir(directory).await?;

    let response = api.download_file(&url).await?;
    write_atomically(response, &output_path, show_progress).await?;

    Ok(SaveOutcome::Saved(output_path))
}

/// Stream a response into a temporary sibling file, then rename it into place.
///
/// The temporary file is removed on any failure, so `output_path` only ever
/// holds a complete payload.
async fn write_atomically(response: Response, output_path: &Path, show_progress: bool) -> Result<()> {
    let temp_path = partial_path(output_path);

    let progress = match response.content_length() {
        Some(len) if show_progress && len > PROGRESS_THRESHOLD => {
            let pb = create_download_bar(len);
            if let Some(name) = output_path.file_name() {
                pb.set_message(name.to_string_lossy().into_owned());
            }
            Some(pb)
        }
        _ => None,
    };

    let result = match write_stream(response, &temp_path, progress.as_ref()).await {
        Ok(bytes) => {
            tracing::debug!("Wrote {} bytes to {}", bytes, temp_path.display());
            tokio::fs::rename(&temp_path, output_path)
                .await
                .map_err(Error::from)
        }
        Err(e) => Err(e),
    };

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(&temp_path).await {
            tracing::debug!("Could not remove {}: {}", temp_path.display(), e);
        }
    }

    result
}

/// Write the response body to `path`, returning the number of bytes written.
async fn write_stream(response: Response, path: &Path, progress: Option<&ProgressBar>) -> Result<u64> {
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(pb) = progress {
            pb.set_position(downloaded);
        }
    }

    file.flush().await?;
    file.sync_all().await?;

    Ok(downloaded)
}
