//! Configuration validation logic.

use url::Url;

use crate::api::client::MAX_PAGE_SIZE;
use crate::config::loader::Config;
use crate::config::modes::RunMode;
use crate::error::{Error, Result};

/// Validate the configuration for what the given mode needs.
pub fn validate_config(config: &Config, mode: &RunMode) -> Result<()> {
    let credentials = &config.credentials;

    match mode {
        RunMode::ConsentUrl => {
            validate_required("client_id", &credentials.client_id)?;
            validate_url("redirect_uri", &credentials.redirect_uri)?;
            validate_url("auth_url", &config.endpoints.auth_url)?;
        }
        RunMode::ExchangeCode(code) => {
            validate_required("authorization code", code)?;
            validate_required("client_id", &credentials.client_id)?;
            validate_required("client_secret", &credentials.client_secret)?;
            validate_url("redirect_uri", &credentials.redirect_uri)?;
            validate_url("token_url", &config.endpoints.token_url)?;
        }
        RunMode::Download => {
            validate_required("client_id", &credentials.client_id)?;
            validate_required("client_secret", &credentials.client_secret)?;
            validate_required("refresh_token", &credentials.refresh_token)?;
            validate_url("token_url", &config.endpoints.token_url)?;
            validate_url("api_base_url", &config.endpoints.api_base_url)?;
            validate_page_size(config.options.page_size)?;
            validate_workers(config.options.workers)?;
        }
    }

    Ok(())
}

/// Validate that a credential is present and not a placeholder.
pub fn validate_required(field: &str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::MissingConfig(field.to_string()));
    }

    let lower = value.to_lowercase();
    if lower.contains("replaceme") || lower.starts_with("your_") || lower.starts_with("<") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("'{}' appears to be a placeholder", value),
        });
    }

    Ok(())
}

/// Validate that a value is an absolute URL.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    validate_required(field, value)?;

    Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    Ok(())
}

/// Validate the listing page size.
pub fn validate_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(Error::ConfigValidation {
            field: "page_size".to_string(),
            message: format!(
                "Page size must be between 1 and {} (got {})",
                MAX_PAGE_SIZE, page_size
            ),
        });
    }
    Ok(())
}

/// Validate the worker count.
pub fn validate_workers(workers: usize) -> Result<()> {
    if workers == 0 {
        return Err(Error::ConfigValidation {
            field: "workers".to_string(),
            message: "At least one worker is required".to_string(),
        });
    }
    Ok(())
}
