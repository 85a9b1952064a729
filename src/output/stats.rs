//! Statistics reporting.

use console::style;

use crate::download::DownloadState;

/// Print statistics for a finished run.
pub fn print_download_stats(state: &DownloadState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Statistics:").bold());
    if state.pages > 0 {
        println!("  Pages:    {}", state.pages);
    }
    println!("  Pictures: {}", state.pic_count);
    println!("  Videos:   {}", state.vid_count);
    println!("  Skipped:  {} (already downloaded)", state.skipped_count);
    if state.failed_count > 0 {
        println!("  Failed:   {}", style(state.failed_count).red());
    }
    println!(
        "  Total:    {} downloaded of {} processed",
        state.total_downloaded(),
        state.total_processed()
    );
    if state.stopped_early {
        println!(
            "  {}",
            style("Stopped at the first item already on disk").dim()
        );
    }
    println!("{}", style("═".repeat(50)).dim());
}

/// Print a summary line for quick viewing.
pub fn print_summary(state: &DownloadState) {
    println!(
        "Downloaded: {} pics, {} vids ({} skipped, {} failed)",
        style(state.pic_count).green(),
        style(state.vid_count).green(),
        style(state.skipped_count).yellow(),
        style(state.failed_count).red()
    );
}
