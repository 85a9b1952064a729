//! Run mode and download strategy definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the library is downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStrategy {
    /// Walk pages in order and stop at the first item already on disk (default).
    #[default]
    Sequential,
    /// List the whole library, then download with a pool of workers.
    Concurrent,
}

impl fmt::Display for DownloadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadStrategy::Sequential => write!(f, "sequential"),
            DownloadStrategy::Concurrent => write!(f, "concurrent"),
        }
    }
}

impl FromStr for DownloadStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(DownloadStrategy::Sequential),
            "concurrent" => Ok(DownloadStrategy::Concurrent),
            _ => Err(format!("Unknown download strategy: {}", s)),
        }
    }
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Mirror the library into the download directory.
    #[default]
    Download,
    /// Print the consent URL and exit.
    ConsentUrl,
    /// Exchange an authorization code for a refresh token and exit.
    ExchangeCode(String),
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Download => write!(f, "download"),
            RunMode::ConsentUrl => write!(f, "consent url"),
            RunMode::ExchangeCode(_) => write!(f, "exchange code"),
        }
    }
}
