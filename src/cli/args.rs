//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{Config, DownloadStrategy, RunMode};
use crate::output::print_warning;

/// Google Photos library backup CLI.
#[derive(Parser, Debug)]
#[command(
    name = "photos-backup",
    version,
    about = "Back up a Google Photos library to a local directory",
    long_about = "A CLI tool that mirrors every photo and video of a Google Photos library \
                  into a local directory.\n\n\
                  Run with --generate-uri to obtain a consent URL, then with \
                  --fetch-refresh-token CODE to turn the returned code into a refresh token."
)]
pub struct Args {
    /// Directory to download media into (defaults to the current directory).
    pub output_dir: Option<PathBuf>,

    /// Print the OAuth consent URL and exit.
    #[arg(short = 'g', long = "generate-uri", conflicts_with = "fetch_refresh_token")]
    pub generate_uri: bool,

    /// Exchange an authorization code for a refresh token and exit.
    #[arg(short = 'f', long = "fetch-refresh-token", value_name = "CODE")]
    pub fetch_refresh_token: Option<String>,

    /// OAuth client ID.
    #[arg(long = "client-id", env = "GOOGLE_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    /// OAuth client secret.
    #[arg(long = "client-secret", env = "GOOGLE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth refresh token.
    #[arg(
        long = "refresh-token",
        env = "GOOGLE_CLIENT_REFRESH_TOKEN",
        hide_env_values = true
    )]
    pub refresh_token: Option<String>,

    /// OAuth redirect URI registered for the client.
    #[arg(long = "redirect-uri", env = "GOOGLE_CLIENT_REDIRECT_URI")]
    pub redirect_uri: Option<String>,

    /// Path to configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Download strategy.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Shorthand for --strategy concurrent.
    #[arg(long, conflicts_with = "strategy")]
    pub concurrent: bool,

    /// Number of concurrent download workers.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Items requested per listing page (1-100).
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Download items even if their file already exists.
    #[arg(long)]
    pub force: bool,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI download strategy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Walk pages in order, stopping at the first item already on disk.
    Sequential,
    /// List everything, then download with a worker pool.
    Concurrent,
}

impl From<StrategyArg> for DownloadStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sequential => DownloadStrategy::Sequential,
            StrategyArg::Concurrent => DownloadStrategy::Concurrent,
        }
    }
}

/// Load `GOOGLE_*` variables from a `.env` file so the `env` fallbacks see them.
///
/// Without `path`, `.env` is searched from the working directory upwards.
/// Variables already present in the environment are never overwritten.
/// Returns the file that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };

    match loaded {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => {
            print_warning(&format!("Ignoring unreadable .env file: {}", e));
            None
        }
    }
}

impl Args {
    /// The mode selected by the flags.
    pub fn run_mode(&self) -> RunMode {
        if let Some(code) = &self.fetch_refresh_token {
            RunMode::ExchangeCode(code.clone())
        } else if self.generate_uri {
            RunMode::ConsentUrl
        } else {
            RunMode::Download
        }
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        // Credentials (flags or GOOGLE_* environment)
        if let Some(client_id) = self.client_id {
            config.credentials.client_id = client_id;
        }

        if let Some(client_secret) = self.client_secret {
            config.credentials.client_secret = client_secret;
        }

        if let Some(refresh_token) = self.refresh_token {
            config.credentials.refresh_token = refresh_token;
        }

        if let Some(redirect_uri) = self.redirect_uri {
            config.credentials.redirect_uri = redirect_uri;
        }

        // Options
        if let Some(dir) = self.output_dir {
            config.options.download_directory = Some(dir);
        }

        if let Some(strategy) = self.strategy {
            config.options.strategy = strategy.into();
        }

        if self.concurrent {
            config.options.strategy = DownloadStrategy::Concurrent;
        }

        if let Some(workers) = self.workers {
            config.options.workers = workers;
        }

        if let Some(page_size) = self.page_size {
            config.options.page_size = page_size;
        }

        // Boolean flags (only override if set to non-default)
        if self.force {
            config.options.force_update = true;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["photos-backup"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_mode_is_download() {
        let args = parse(&[]);
        assert_eq!(args.run_mode(), RunMode::Download);
        assert!(args.output_dir.is_none());
    }

    #[test]
    fn test_generate_uri_mode() {
        assert_eq!(parse(&["-g"]).run_mode(), RunMode::ConsentUrl);
        assert_eq!(parse(&["--generate-uri"]).run_mode(), RunMode::ConsentUrl);
    }

    #[test]
    fn test_fetch_refresh_token_mode() {
        let args = parse(&["-f", "4/0Abc"]);
        assert_eq!(args.run_mode(), RunMode::ExchangeCode("4/0Abc".to_string()));
    }

    #[test]
    fn test_generate_and_fetch_conflict() {
        let result = Args::try_parse_from(["photos-backup", "-g", "-f", "code"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_overrides_config() {
        let args = parse(&[
            "/backup",
            "--client-id",
            "cli-id",
            "--concurrent",
            "--workers",
            "6",
            "--page-size",
            "25",
            "--force",
            "--quiet",
        ]);

        let mut config = Config::default();
        config.credentials.client_id = "file-id".to_string();
        config.credentials.client_secret = "file-secret".to_string();
        args.merge_into_config(&mut config);

        assert_eq!(config.credentials.client_id, "cli-id");
        assert_eq!(config.options.download_directory, Some(PathBuf::from("/backup")));
        assert_eq!(config.options.strategy, DownloadStrategy::Concurrent);
        assert_eq!(config.options.workers, 6);
        assert_eq!(config.options.page_size, 25);
        assert!(config.options.force_update);
        assert!(!config.options.show_downloads);
    }

    #[test]
    fn test_strategy_flag() {
        let args = parse(&["--strategy", "sequential"]);
        let mut config = Config::default();
        config.options.strategy = DownloadStrategy::Concurrent;
        args.merge_into_config(&mut config);
        assert_eq!(config.options.strategy, DownloadStrategy::Sequential);
    }

    #[test]
    fn test_env_file_feeds_credential_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(
            &env_path,
            "GOOGLE_CLIENT_SECRET=secret-from-dotenv\n",
        )
        .unwrap();

        assert_eq!(load_env_file(Some(&env_path)), Some(env_path.clone()));

        let args = parse(&[]);
        assert_eq!(args.client_secret.as_deref(), Some("secret-from-dotenv"));
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_env_file(Some(&dir.path().join(".env"))), None);
    }
}
