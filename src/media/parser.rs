//! Conversion from API responses to media items.

use crate::api::types::{ApiMediaItem, ApiMediaMetadata, ApiPhotoMetadata, ApiVideoMetadata};
use crate::media::item::{
    MediaDetails, MediaItem, MediaMetadata, MediaType, PhotoMetadata, VideoMetadata,
};

/// Parse an API media item into a [`MediaItem`].
pub fn parse_media_item(raw: ApiMediaItem) -> MediaItem {
    let mime_type = raw.mime_type.unwrap_or_default();
    let metadata = raw
        .media_metadata
        .map(|meta| parse_metadata(meta, &mime_type));

    MediaItem {
        id: raw.id,
        product_url: raw.product_url,
        base_url: raw.base_url,
        mime_type,
        filename: raw.filename,
        metadata,
    }
}

/// Parse the metadata block, keeping at most one variant record.
fn parse_metadata(meta: ApiMediaMetadata, mime_type: &str) -> MediaMetadata {
    let photo = meta.photo.filter(|p| !p.is_empty()).map(photo_details);
    let video = meta.video.filter(|v| !v.is_empty()).map(video_details);

    // Both blocks filled is not expected; the MIME type decides
    let details = match (photo, video) {
        (Some(photo), Some(video)) => {
            if MediaType::from_mime(mime_type) == MediaType::Video {
                Some(video)
            } else {
                Some(photo)
            }
        }
        (photo, video) => photo.or(video),
    };

    MediaMetadata {
        creation_time: meta.creation_time,
        width: meta.width.and_then(|w| w.as_u32()),
        height: meta.height.and_then(|h| h.as_u32()),
        details,
    }
}

fn photo_details(photo: ApiPhotoMetadata) -> MediaDetails {
    MediaDetails::Photo(PhotoMetadata {
        camera_make: photo.camera_make,
        camera_model: photo.camera_model,
        focal_length: photo.focal_length,
        aperture_f_number: photo.aperture_f_number,
        iso_equivalent: photo.iso_equivalent,
        exposure_time: photo.exposure_time,
    })
}

fn video_details(video: ApiVideoMetadata) -> MediaDetails {
    MediaDetails::Video(VideoMetadata {
        camera_make: video.camera_make,
        camera_model: video.camera_model,
        fps: video.fps,
        status: video.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> MediaItem {
        parse_media_item(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parse_photo() {
        let item = parse(
            r#"{
                "id": "AF1QipN",
                "productUrl": "https://photos.google.com/lr/photo/AF1QipN",
                "baseUrl": "https://lh3.googleusercontent.com/lr/abc",
                "mimeType": "image/jpeg",
                "filename": "IMG_0001.JPG",
                "mediaMetadata": {
                    "creationTime": "2021-07-14T09:30:12Z",
                    "width": "4032",
                    "height": "3024",
                    "photo": {
                        "cameraMake": "Apple",
                        "cameraModel": "iPhone 12",
                        "focalLength": 4.2,
                        "apertureFNumber": 1.6,
                        "isoEquivalent": 32,
                        "exposureTime": "0.001s"
                    }
                }
            }"#,
        );

        assert_eq!(item.id, "AF1QipN");
        assert_eq!(item.filename.as_deref(), Some("IMG_0001.JPG"));
        let meta = item.metadata.unwrap();
        assert_eq!(meta.width, Some(4032));
        assert_eq!(meta.height, Some(3024));
        match meta.details {
            Some(MediaDetails::Photo(photo)) => {
                assert_eq!(photo.camera_make.as_deref(), Some("Apple"));
                assert_eq!(photo.iso_equivalent, Some(32));
            }
            other => panic!("Expected photo details, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_video() {
        let item = parse(
            r#"{
                "id": "vid",
                "baseUrl": "https://lh3.googleusercontent.com/lr/vid",
                "mimeType": "video/mp4",
                "mediaMetadata": {
                    "creationTime": "2021-07-14T09:30:12Z",
                    "video": {"fps": 29.97, "status": "READY"}
                }
            }"#,
        );

        match item.metadata.unwrap().details {
            Some(MediaDetails::Video(video)) => {
                assert_eq!(video.status.as_deref(), Some("READY"));
                assert_eq!(video.fps, Some(29.97));
            }
            other => panic!("Expected video details, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_photo_block_is_ignored() {
        let item = parse(
            r#"{
                "id": "a",
                "mimeType": "image/png",
                "mediaMetadata": {"creationTime": "2020-01-01T00:00:00Z", "photo": {}}
            }"#,
        );
        assert!(item.metadata.unwrap().details.is_none());
    }

    #[test]
    fn test_both_blocks_follow_mime_type() {
        let item = parse(
            r#"{
                "id": "a",
                "mimeType": "video/mp4",
                "mediaMetadata": {
                    "photo": {"cameraMake": "X"},
                    "video": {"cameraMake": "Y"}
                }
            }"#,
        );
        assert!(matches!(
            item.metadata.unwrap().details,
            Some(MediaDetails::Video(_))
        ));
    }

    #[test]
    fn test_missing_optional_fields() {
        let item = parse(r#"{"id": "bare"}"#);
        assert_eq!(item.id, "bare");
        assert!(item.base_url.is_none());
        assert!(item.mime_type.is_empty());
        assert!(item.metadata.is_none());
    }
}
