//! Download statistics.

use crate::media::MediaType;

/// Counters for one download run (or one coordinator worker).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadState {
    /// Listing pages fetched.
    pub pages: u64,

    /// Items saved, by kind.
    pub pic_count: u64,
    pub vid_count: u64,

    /// Items whose file was already on disk.
    pub skipped_count: u64,

    /// Items that failed to download or save.
    pub failed_count: u64,

    /// Set when the sequential walk stopped at an already-downloaded item.
    pub stopped_early: bool,
}

impl DownloadState {
    /// Count a successfully saved item.
    pub fn record_saved(&mut self, media_type: MediaType) {
        match media_type {
            MediaType::Image => self.pic_count += 1,
            MediaType::Video => self.vid_count += 1,
            // Unknown types are rejected before saving
            MediaType::Unknown => {}
        }
    }

    /// Increment fetched page count.
    pub fn increment_page(&mut self) {
        self.pages += 1;
    }

    /// Increment already-downloaded count.
    pub fn increment_skipped(&mut self) {
        self.skipped_count += 1;
    }

    /// Increment failure count.
    pub fn increment_failed(&mut self) {
        self.failed_count += 1;
    }

    /// Get total downloaded count.
    pub fn total_downloaded(&self) -> u64 {
        self.pic_count + self.vid_count
    }

    /// Total items attempted.
    pub fn total_processed(&self) -> u64 {
        self.total_downloaded() + self.skipped_count + self.failed_count
    }

    /// Add another state's counters to this one.
    pub fn merge(&mut self, other: &DownloadState) {
        self.pages += other.pages;
        self.pic_count += other.pic_count;
        self.vid_count += other.vid_count;
        self.skipped_count += other.skipped_count;
        self.failed_count += other.failed_count;
        self.stopped_early |= other.stopped_early;
    }
}
