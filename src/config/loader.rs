//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::client::{API_BASE, MAX_PAGE_SIZE};
use crate::api::Credentials;
use crate::config::modes::DownloadStrategy;
use crate::download::DEFAULT_WORKERS;
use crate::error::{Error, Result};

/// Google OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google OAuth consent endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub credentials: Credentials,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Directory the library is mirrored into.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Sequential page-by-page walk or concurrent drain.
    #[serde(default)]
    pub strategy: DownloadStrategy,

    /// Number of concurrent workers for the concurrent strategy.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Items requested per listing page (at most 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Download items even when their file already exists.
    #[serde(default)]
    pub force_update: bool,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            strategy: DownloadStrategy::default(),
            workers: DEFAULT_WORKERS,
            page_size: MAX_PAGE_SIZE,
            force_update: false,
            show_downloads: true,
        }
    }
}

/// Remote endpoints. Only overridden for testing or proxies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token_url: default_token_url(),
            auth_url: default_auth_url(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_api_base_url() -> String {
    API_BASE.to_string()
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

/// Default location of the configuration file.
///
/// Uses the platform config directory, falling back to `./config.toml`.
pub fn default_config_path() -> PathBuf {
    ProjectDirs::from("", "", "photos-backup")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Store a new refresh token and save it to the file if path provided.
    ///
    /// Only the token is written: the file is re-read and saved with that one
    /// field changed, so CLI and environment overrides merged into `self`
    /// never end up on disk.
    pub fn update_refresh_token(&mut self, refresh_token: String, path: Option<&Path>) -> Result<()> {
        if let Some(path) = path {
            let mut on_disk = if path.exists() {
                Config::load(path)?
            } else {
                Config::default()
            };
            on_disk.credentials.refresh_token = refresh_token.clone();
            on_disk.save(path)?;
        }

        self.credentials.refresh_token = refresh_token;
        Ok(())
    }
}
