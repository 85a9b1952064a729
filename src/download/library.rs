//! Library walk: pagination over the media item listing.

use std::path::Path;

use crate::api::PhotosApi;
use crate::download::media::{MediaSaver, SaveOutcome};
use crate::download::state::DownloadState;
use crate::error::Result;
use crate::media::MediaItem;

/// Download every item of the library, page by page, in listing order.
///
/// The listing is newest first, so unless `force_update` is set the walk ends
/// at the first item that is already on disk: everything after it is assumed
/// to be backed up too. Other per-item failures are logged and skipped. A
/// failure fetching a page aborts the walk.
pub async fn download_all<S>(
    api: &PhotosApi,
    saver: &S,
    directory: &Path,
    page_size: u32,
    force_update: bool,
) -> Result<DownloadState>
where
    S: MediaSaver + ?Sized,
{
    let mut state = DownloadState::default();
    let mut cursor: Option<String> = None;
    let mut first = true;

    'pages: while first || cursor.is_some() {
        first = false;
        tracing::info!(
            "Downloading page: {}",
            cursor.as_deref().unwrap_or("N/A")
        );

        let page = api.list_page(page_size, cursor.as_deref()).await?;
        state.increment_page();
        cursor = page.next_cursor;

        for item in &page.items {
            match saver.save(item, directory, force_update).await {
                Ok(SaveOutcome::Saved(_)) => state.record_saved(item.media_type()),
                Ok(SaveOutcome::AlreadyDownloaded(path)) => {
                    state.increment_skipped();
                    if force_update {
                        continue;
                    }
                    tracing::info!(
                        "Media item {} already downloaded ({}), stopping",
                        item.id,
                        path.display()
                    );
                    state.stopped_early = true;
                    break 'pages;
                }
                Err(e) => {
                    state.increment_failed();
                    tracing::warn!("Failed to download media {}: {}", item.id, e);
                }
            }
        }
    }

    tracing::info!(
        "Library download complete: {} pictures, {} videos",
        state.pic_count,
        state.vid_count
    );

    Ok(state)
}

/// List every item of the library without downloading anything.
pub async fn collect_all(api: &PhotosApi, page_size: u32) -> Result<Vec<MediaItem>> {
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api.list_page(page_size, cursor.as_deref()).await?;
        items.extend(page.items);
        tracing::debug!("Collected {} media items so far", items.len());

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::info!("Found {} media items", items.len());
    Ok(items)
}
