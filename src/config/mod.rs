//! Configuration module for photos-backup.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Run modes and download strategies
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{default_config_path, Config, EndpointsConfig, OptionsConfig};
pub use modes::{DownloadStrategy, RunMode};
pub use validation::validate_config;
