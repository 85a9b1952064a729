//! Media module for item representation and parsing.

pub mod item;
pub mod parser;

pub use item::{
    MediaDetails, MediaItem, MediaMetadata, MediaType, PhotoMetadata, VideoMetadata,
};
pub use parser::parse_media_item;
