//! Photos Library API module.
//!
//! This module provides:
//! - OAuth2 token lifecycle (refresh, caching, code exchange, consent URL)
//! - Authenticated HTTP client for the REST API
//! - API response types

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{consent_url, AccessToken, Credentials, TokenManager};
pub use client::{build_http_client, Page, PhotosApi, MAX_PAGE_SIZE};
pub use types::*;
