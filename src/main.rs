//! Photos Backup - CLI entry point.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use photos_backup::{
    api::{consent_url, PhotosApi},
    cli::{load_env_file, Args},
    config::{default_config_path, validate_config, Config, DownloadStrategy, RunMode},
    download::{collect_all, download_all, Coordinator, DownloadState, Downloader},
    error::{exit_codes, Error, Result},
    fs::{ensure_dir, remove_stale_partials},
    output::{
        create_spinner, print_banner, print_config_summary, print_download_stats, print_error,
        print_info, print_success, print_summary, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run() -> Result<()> {
    // GOOGLE_* variables from .env feed the clap env fallbacks
    let env_file = load_env_file(None);

    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    if let Some(path) = &env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let config_exists = config_path.exists();
    let mut config = if config_exists {
        Config::load(&config_path)?
    } else {
        if args.config.is_some() {
            return Err(Error::Config(format!(
                "Configuration file not found: {}",
                config_path.display()
            )));
        }
        tracing::debug!(
            "No configuration file at {}, using defaults",
            config_path.display()
        );
        Config::default()
    };

    // Merge CLI arguments into config
    let mode = args.run_mode();
    args.merge_into_config(&mut config);
    tracing::debug!("Run mode: {}", mode);

    validate_config(&config, &mode)?;

    match mode {
        RunMode::ConsentUrl => {
            let url = consent_url(&config.credentials, &config.endpoints.auth_url)?;
            print_info("Open this URL in a browser and grant access:");
            println!("{}", url);
            Ok(())
        }
        RunMode::ExchangeCode(code) => {
            exchange_code(&mut config, &code, config_exists.then_some(config_path.as_path()))
                .await
        }
        RunMode::Download => download(&config).await,
    }
}

/// Exchange an authorization code and print (and persist) the refresh token.
async fn exchange_code(config: &mut Config, code: &str, config_path: Option<&Path>) -> Result<()> {
    let api = PhotosApi::from_config(config)?;
    let refresh_token = api.tokens().exchange_authorization_code(code).await?;

    print_success("Obtained refresh token:");
    println!("{}", refresh_token);

    config.update_refresh_token(refresh_token, config_path)?;
    match config_path {
        Some(path) => print_info(&format!("Saved refresh token to {}", path.display())),
        None => print_info("Set GOOGLE_CLIENT_REFRESH_TOKEN or add it to the config file"),
    }

    Ok(())
}

/// Mirror the library into the download directory.
async fn download(config: &Config) -> Result<()> {
    let options = &config.options;
    let directory = config.download_directory();

    if options.show_downloads {
        print_banner();
        print_config_summary(
            &options.strategy.to_string(),
            (options.strategy == DownloadStrategy::Concurrent).then_some(options.workers),
            &directory.display().to_string(),
            options.force_update,
        );
    }

    ensure_dir(&directory).await?;
    let removed = remove_stale_partials(&directory).await?;
    if removed > 0 {
        print_warning(&format!(
            "Removed {} incomplete download(s) from a previous run",
            removed
        ));
    }

    let api = Arc::new(PhotosApi::from_config(config)?);
    let downloader = Downloader::new(Arc::clone(&api)).show_downloads(options.show_downloads);

    let state = match options.strategy {
        DownloadStrategy::Sequential => {
            let downloader = downloader.show_progress(options.show_downloads);
            download_all(
                &api,
                &downloader,
                &directory,
                options.page_size,
                options.force_update,
            )
            .await?
        }
        DownloadStrategy::Concurrent => {
            download_concurrently(&api, downloader, &directory, config).await?
        }
    };

    if options.show_downloads {
        print_download_stats(&state);
    } else {
        print_summary(&state);
    }

    Ok(())
}

/// Collect every item first, then drain the list with the worker pool.
async fn download_concurrently(
    api: &PhotosApi,
    downloader: Downloader,
    directory: &Path,
    config: &Config,
) -> Result<DownloadState> {
    let options = &config.options;

    let spinner = options
        .show_downloads
        .then(|| create_spinner("Listing media items..."));
    let items = collect_all(api, options.page_size).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    let items = items?;

    let coordinator =
        Coordinator::new(Arc::new(downloader), options.workers).show_progress(options.show_downloads);

    print_info(&format!(
        "Found {} media items, downloading with {} workers",
        items.len(),
        coordinator.workers()
    ));
    Ok(coordinator
        .run(items, directory, options.force_update)
        .await)
}
