//! Upscale handler
//!
//! `GET /upscale?url=...&targetSize=4096` scales the longer side of the
//! source up to `targetSize` with the Lanczos-3 kernel plus a light unsharp
//! mask, preserving aspect ratio. A source already at or above the target is
//! passed through untouched. Output is always PNG, with the original and new
//! dimensions reported in `X-*` headers.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Response, StatusCode};

use super::{fetch_error_response, imaging_error_response, join_error_response};
use crate::config::AppState;
use crate::fetch;
use crate::http::{self, QueryMap};
use crate::imaging::{self, FitMode, ImagingError, OutputFormat, Quality, Sharpening};

/// Result of an upscale transform.
struct UpscaleOutcome {
    data: Vec<u8>,
    original: (u32, u32),
    new: (u32, u32),
    upscaled: bool,
}

pub async fn handle_upscale(query: &QueryMap, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let Some(url) = query.get("url") else {
        return http::build_error_response(StatusCode::BAD_REQUEST, "url parameter required");
    };

    let target_size = match query.get_u32("targetSize") {
        Ok(value) => value.unwrap_or(state.config.image.default_target_size),
        Err(message) => return http::build_error_response(StatusCode::BAD_REQUEST, &message),
    };
    if target_size == 0 {
        return http::build_error_response(StatusCode::BAD_REQUEST, "targetSize must be positive");
    }

    let source = match fetch::fetch_image(
        &state.http_client,
        url,
        state.config.fetch.max_source_bytes,
    )
    .await
    {
        Ok(bytes) => bytes,
        Err(e) => return fetch_error_response("/upscale", &e),
    };

    let max_pixels = state.config.image.max_pixels;
    let outcome =
        tokio::task::spawn_blocking(move || upscale(&source, target_size, max_pixels)).await;

    let outcome = match outcome {
        Ok(Ok(o)) => o,
        Ok(Err(e)) => return imaging_error_response("/upscale", &e),
        Err(e) => return join_error_response("/upscale", &e),
    };

    let mut response = http::build_image_response(
        outcome.data,
        OutputFormat::Png.content_type(),
        state.config.http.cache_max_age,
    );
    let headers = response.headers_mut();
    headers.insert("X-Original-Width", HeaderValue::from(outcome.original.0));
    headers.insert("X-Original-Height", HeaderValue::from(outcome.original.1));
    headers.insert("X-New-Width", HeaderValue::from(outcome.new.0));
    headers.insert("X-New-Height", HeaderValue::from(outcome.new.1));
    headers.insert(
        "X-Upscaled",
        HeaderValue::from_static(if outcome.upscaled { "true" } else { "false" }),
    );
    response
}

/// Decode, optionally enlarge + sharpen, and encode as PNG on a blocking
/// thread.
fn upscale(data: &[u8], target_size: u32, max_pixels: u64) -> Result<UpscaleOutcome, ImagingError> {
    let img = imaging::decode(data, max_pixels)?;
    let original = (img.width(), img.height());

    let new = imaging::upscale_dimensions(original.0, original.1, target_size);
    let upscaled = new != original;

    let output = if upscaled {
        let resized = imaging::resize(&img, new.0, new.1, FitMode::Fill);
        imaging::sharpen(&resized, Sharpening::light())
    } else {
        img
    };

    let data = imaging::encode(&output, OutputFormat::Png, Quality::default())?;
    Ok(UpscaleOutcome {
        data,
        original,
        new,
        upscaled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 200])
        }));
        imaging::encode(&img, OutputFormat::Png, Quality::default()).unwrap()
    }

    #[test]
    fn small_source_is_enlarged_to_target() {
        let data = png_bytes(40, 20);
        let outcome = upscale(&data, 80, 1_000_000).unwrap();

        assert_eq!(outcome.original, (40, 20));
        assert_eq!(outcome.new, (80, 40));
        assert!(outcome.upscaled);

        let info = imaging::probe(&outcome.data).unwrap();
        assert_eq!((info.width, info.height), (80, 40));
        assert_eq!(info.format, "png");
    }

    #[test]
    fn large_source_passes_through() {
        let data = png_bytes(100, 60);
        let outcome = upscale(&data, 50, 1_000_000).unwrap();

        assert_eq!(outcome.original, (100, 60));
        assert_eq!(outcome.new, (100, 60));
        assert!(!outcome.upscaled);

        let info = imaging::probe(&outcome.data).unwrap();
        assert_eq!((info.width, info.height), (100, 60));
    }

    #[test]
    fn portrait_source_scales_height_to_target() {
        let data = png_bytes(20, 40);
        let outcome = upscale(&data, 100, 1_000_000).unwrap();
        assert_eq!(outcome.new, (50, 100));
    }

    #[test]
    fn non_image_payload_errors() {
        let outcome = upscale(b"definitely not an image", 100, 1_000_000);
        assert!(outcome.is_err());
    }
}
