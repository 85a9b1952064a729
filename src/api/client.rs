//! Photos Library API HTTP client.

use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

use crate::api::auth::TokenManager;
use crate::api::types::MediaItemsResponse;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::media::{parse_media_item, MediaItem};

/// Photos Library API base URL.
pub const API_BASE: &str = "https://photoslibrary.googleapis.com";

/// Listing endpoint path.
pub const MEDIA_ITEMS_PATH: &str = "/v1/mediaItems";

/// Largest page size the listing endpoint honors.
pub const MAX_PAGE_SIZE: u32 = 100;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("photos-backup/", env!("CARGO_PKG_VERSION"));

/// One page of the media item listing.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Items in server listing order.
    pub items: Vec<MediaItem>,
    /// Cursor for the next page; `None` once the collection is exhausted.
    pub next_cursor: Option<String>,
}

/// Authenticated client for the library API.
pub struct PhotosApi {
    client: Client,
    tokens: Arc<TokenManager>,
    base_url: String,
}

impl PhotosApi {
    /// Create a client on top of an existing HTTP client and token manager.
    pub fn new(client: Client, tokens: Arc<TokenManager>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the HTTP client, token manager and API client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client()?;
        let tokens = Arc::new(TokenManager::new(
            client.clone(),
            config.credentials.clone(),
            config.endpoints.token_url.clone(),
        ));
        Ok(Self::new(client, tokens, config.endpoints.api_base_url.clone()))
    }

    /// The token manager used for every call.
    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Make an authenticated request and return the decoded JSON body.
    ///
    /// A token is requested for every call so expiry is checked per request.
    pub async fn call(&self, method: Method, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.tokens.get_valid_token().await?;

        tracing::debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        let text = response.text().await?;

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            Error::MalformedResponse(format!(
                "Failed to parse response from {}: {} - Response: {}",
                path,
                e,
                body_snippet(&text)
            ))
        })?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::error!("Auth error response: {}", body);
            return Err(Error::Authentication(format!("HTTP {}: {}", status, body)));
        }

        if !status.is_success() {
            return Err(Error::Api(format!("HTTP {} from {}: {}", status, path, body)));
        }

        Ok(body)
    }

    /// Fetch one page of media items.
    ///
    /// `cursor = None` requests the first page.
    pub async fn list_page(&self, page_size: u32, cursor: Option<&str>) -> Result<Page> {
        let mut query = vec![("pageSize", page_size.to_string())];
        if let Some(cursor) = cursor {
            query.push(("pageToken", cursor.to_string()));
        }

        let body = self.call(Method::GET, MEDIA_ITEMS_PATH, &query).await?;
        let response: MediaItemsResponse = serde_json::from_value(body)
            .map_err(|e| Error::MalformedResponse(format!("Failed to parse media items: {}", e)))?;

        tracing::debug!(
            "Listed {} media items (more: {})",
            response.media_items.len(),
            response.next_page_token.is_some()
        );

        Ok(Page {
            items: response.media_items.into_iter().map(parse_media_item).collect(),
            next_cursor: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    /// Download a media payload. Capability URLs need no bearer token.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

/// Build the shared HTTP client.
pub fn build_http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))
}

/// First part of a response body, for error messages.
pub(crate) fn body_snippet(text: &str) -> String {
    text.chars().take(500).collect()
}
