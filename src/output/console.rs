//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Photos Backup                                     ║
║     Mirror a Google Photos library to local disk      ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary. `workers` is only shown for the concurrent strategy.
pub fn print_config_summary(strategy: &str, workers: Option<usize>, download_dir: &str, force: bool) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Strategy:  {}", strategy);
    if let Some(workers) = workers {
        println!("  Workers:   {}", workers);
    }
    println!("  Directory: {}", download_dir);
    if force {
        println!("  Force:     existing files will be re-downloaded");
    }
    println!();
}
