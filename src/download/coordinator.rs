//! Concurrent download of a pre-collected set of media items.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use indicatif::ProgressBar;

use crate::download::media::{MediaSaver, SaveOutcome};
use crate::download::state::DownloadState;
use crate::media::MediaItem;
use crate::output::create_item_bar;

/// Default number of concurrent download workers.
pub const DEFAULT_WORKERS: usize = 3;

/// Drains a list of media items with a fixed number of workers.
///
/// Items are frozen into a shared slice and each worker claims the next index
/// with a single atomic increment, so every item goes to exactly one worker.
pub struct Coordinator<S: MediaSaver + ?Sized + 'static> {
    saver: Arc<S>,
    workers: usize,
    show_progress: bool,
}

impl<S: MediaSaver + ?Sized + 'static> Coordinator<S> {
    /// Create a coordinator; `workers` is clamped to at least one.
    pub fn new(saver: Arc<S>, workers: usize) -> Self {
        Self {
            saver,
            workers: workers.max(1),
            show_progress: false,
        }
    }

    /// Show an item progress bar while draining.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Number of workers that will be spawned.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Save every item, returning the merged statistics of all workers.
    ///
    /// Failures and already-downloaded items are counted and skipped; they
    /// never stop a worker and are never retried.
    pub async fn run(&self, items: Vec<MediaItem>, directory: &Path, force_update: bool) -> DownloadState {
        let items: Arc<[MediaItem]> = items.into();
        let next = Arc::new(AtomicUsize::new(0));

        let progress = if self.show_progress {
            Some(create_item_bar(items.len() as u64, "Downloading"))
        } else {
            None
        };

        tracing::info!(
            "Downloading {} media items with {} workers",
            items.len(),
            self.workers
        );

        let handles: Vec<_> = (0..self.workers)
            .map(|worker_id| {
                let saver = Arc::clone(&self.saver);
                let items = Arc::clone(&items);
                let next = Arc::clone(&next);
                let directory = directory.to_path_buf();
                let progress = progress.clone();

                tokio::spawn(async move {
                    drain(worker_id, saver, items, next, directory, force_update, progress).await
                })
            })
            .collect();

        let mut state = DownloadState::default();
        for result in join_all(handles).await {
            match result {
                Ok(worker_state) => state.merge(&worker_state),
                // Only reachable in unwinding builds; release aborts on panic
                Err(e) => tracing::error!("Download worker failed: {}", e),
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        state
    }
}

/// Worker loop: claim the next index until the list is exhausted.
async fn drain<S: MediaSaver + ?Sized>(
    worker_id: usize,
    saver: Arc<S>,
    items: Arc<[MediaItem]>,
    next: Arc<AtomicUsize>,
    directory: PathBuf,
    force_update: bool,
    progress: Option<ProgressBar>,
) -> DownloadState {
    let mut state = DownloadState::default();

    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(item) = items.get(index) else {
            break;
        };

        match saver.save(item, &directory, force_update).await {
            Ok(SaveOutcome::Saved(_)) => state.record_saved(item.media_type()),
            Ok(SaveOutcome::AlreadyDownloaded(_)) => {
                tracing::debug!("[worker {}] Media item {} already downloaded", worker_id, item.id);
                state.increment_skipped();
            }
            Err(e) => {
                tracing::warn!("[worker {}] Failed to download media {}: {}", worker_id, item.id, e);
                state.increment_failed();
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    tracing::debug!("[worker {}] No items left", worker_id);
    state
}
