//! Error types for the imaging pipeline.

use thiserror::Error;

/// Result type alias for imaging operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Errors that can occur while decoding, transforming, or encoding an image.
#[derive(Debug, Error)]
pub enum ImagingError {
    /// The payload does not start with a recognizable image signature
    #[error("unknown image format")]
    UnknownFormat,

    /// Source dimensions exceed the configured pixel limit
    #[error("image too large: {width}x{height} exceeds the {max_pixels} pixel limit")]
    TooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    /// Crop rectangle falls outside the source image
    #[error("crop rectangle {x},{y} {w}x{h} outside image bounds {width}x{height}")]
    CropOutOfBounds {
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        width: u32,
        height: u32,
    },

    /// Decode error from the image crate
    #[error("decode failed: {0}")]
    Decode(#[source] image::ImageError),

    /// Encode error from the image crate
    #[error("encode failed: {0}")]
    Encode(#[source] image::ImageError),
}

impl ImagingError {
    /// True when the failure is caused by the request parameters rather
    /// than by the image data itself.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::TooLarge { .. } | Self::CropOutOfBounds { .. }
        )
    }
}
