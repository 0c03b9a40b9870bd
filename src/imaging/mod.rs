//! Imaging module entry point
//!
//! Wraps the `image` crate behind a small operation surface: probe, crop,
//! resize (cover/inside/fill), sharpen, encode, and the aspect-preserving
//! upscale dimension computation.

mod error;
mod params;
mod pipeline;

// Re-export public types
pub use error::ImagingError;
pub use params::{CropRect, FitMode, OutputFormat, Quality, Sharpening};
pub use pipeline::{
    crop, decode, encode, probe, resize, sharpen, upscale_dimensions, ImageInfo,
};
