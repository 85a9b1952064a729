//! Media item representation.

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_filename;

/// Type of media content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    Unknown,
}

impl MediaType {
    /// Classify a MIME type by its top-level type.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            MediaType::Image
        } else if mime_type.starts_with("video/") {
            MediaType::Video
        } else {
            MediaType::Unknown
        }
    }

    /// Size/format directive appended to the base URL for the original bytes.
    pub fn download_suffix(&self) -> Option<&'static str> {
        match self {
            MediaType::Image => Some("=d"),
            MediaType::Video => Some("=dv"),
            MediaType::Unknown => None,
        }
    }
}

/// Photo-specific capture metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoMetadata {
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub focal_length: Option<f64>,
    pub aperture_f_number: Option<f64>,
    pub iso_equivalent: Option<u32>,
    pub exposure_time: Option<String>,
}

/// Video-specific capture metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoMetadata {
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub fps: Option<f64>,
    pub status: Option<String>,
}

/// Either photo or video details, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaDetails {
    Photo(PhotoMetadata),
    Video(VideoMetadata),
}

/// Capture metadata of a media item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaMetadata {
    /// ISO-8601 creation time as reported by the server.
    pub creation_time: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub details: Option<MediaDetails>,
}

/// One remote photo or video.
#[derive(Debug, Clone, Default)]
pub struct MediaItem {
    /// Server-assigned, immutable identifier.
    pub id: String,

    /// Link to the item in the web UI.
    pub product_url: Option<String>,

    /// Capability URL; only fetchable with a size/format suffix and may be
    /// rotated by the server, so it is never stored.
    pub base_url: Option<String>,

    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,

    /// Original filename on the uploading device.
    pub filename: Option<String>,

    /// Capture metadata, when available.
    pub metadata: Option<MediaMetadata>,
}

impl MediaItem {
    /// Get the media type based on MIME type.
    pub fn media_type(&self) -> MediaType {
        MediaType::from_mime(&self.mime_type)
    }

    /// File extension: the subtype of the MIME type (`image/jpeg` → `jpeg`).
    pub fn extension(&self) -> &str {
        match self.mime_type.split_once('/') {
            Some((_, subtype)) if !subtype.is_empty() => subtype,
            _ => "bin",
        }
    }

    /// Creation time, if the server reported one.
    pub fn creation_time(&self) -> Option<&str> {
        self.metadata.as_ref()?.creation_time.as_deref()
    }

    /// Generate the local filename for this media item.
    ///
    /// Format: `<creation time with ':' as '-'>-<id>.<extension>`.
    ///
    /// Names the sanitizer would have to rewrite are rejected rather than
    /// rewritten, so distinct ids never share a file.
    pub fn local_filename(&self) -> Result<String> {
        let creation_time = self.creation_time().ok_or_else(|| {
            Error::Media(format!("media item {} has no creation time", self.id))
        })?;

        let name = format!(
            "{}-{}.{}",
            creation_time.replace(':', "-"),
            self.id,
            self.extension()
        );

        let sanitized = sanitize_filename(&name)?;
        if sanitized != name {
            return Err(Error::InvalidFilename(format!(
                "media item {} contains characters not allowed in a filename",
                self.id
            )));
        }
        Ok(sanitized)
    }

    /// URL that returns the original-quality bytes.
    pub fn download_url(&self) -> Result<String> {
        let suffix = self
            .media_type()
            .download_suffix()
            .ok_or_else(|| Error::UnsupportedMediaType(self.mime_type.clone()))?;

        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| Error::Media(format!("media item {} has no base URL", self.id)))?;

        Ok(format!("{}{}", base_url, suffix))
    }
}
