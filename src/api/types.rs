//! API response type definitions.

use serde::Deserialize;

/// Token endpoint response.
///
/// The endpoint answers with either the token fields or the error fields, so
/// everything is optional here and checked by the caller.
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Response of `GET /v1/mediaItems`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemsResponse {
    #[serde(default)]
    pub media_items: Vec<ApiMediaItem>,
    pub next_page_token: Option<String>,
}

/// A media item as returned by the library API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMediaItem {
    pub id: String,
    pub product_url: Option<String>,
    pub base_url: Option<String>,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
    pub media_metadata: Option<ApiMediaMetadata>,
}

/// Metadata block of a media item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMediaMetadata {
    pub creation_time: Option<String>,
    pub width: Option<Int64Value>,
    pub height: Option<Int64Value>,
    pub photo: Option<ApiPhotoMetadata>,
    pub video: Option<ApiVideoMetadata>,
}

/// Photo-specific metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPhotoMetadata {
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub focal_length: Option<f64>,
    pub aperture_f_number: Option<f64>,
    pub iso_equivalent: Option<u32>,
    pub exposure_time: Option<String>,
}

/// Video-specific metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideoMetadata {
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub fps: Option<f64>,
    pub status: Option<String>,
}

/// int64 fields are serialized as JSON strings by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Int64Value {
    Number(u64),
    Text(String),
}

impl Int64Value {
    /// Numeric value, if it fits in a `u32`.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Int64Value::Number(n) => u32::try_from(*n).ok(),
            Int64Value::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl ApiPhotoMetadata {
    /// Whether the block carries any field at all (`"photo": {}` is common).
    pub fn is_empty(&self) -> bool {
        self.camera_make.is_none()
            && self.camera_model.is_none()
            && self.focal_length.is_none()
            && self.aperture_f_number.is_none()
            && self.iso_equivalent.is_none()
            && self.exposure_time.is_none()
    }
}

impl ApiVideoMetadata {
    /// Whether the block carries any field at all.
    pub fn is_empty(&self) -> bool {
        self.camera_make.is_none()
            && self.camera_model.is_none()
            && self.fps.is_none()
            && self.status.is_none()
    }
}
