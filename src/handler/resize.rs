//! Resize handler
//!
//! `GET /resize?url=...` fetches a remote image, optionally extracts a pixel
//! rectangle, optionally resizes it to `width` x `height` with a fit mode,
//! and re-encodes it to the requested format. `info=true` short-circuits to
//! a JSON description of the source.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::{fetch_error_response, imaging_error_response, join_error_response};
use crate::config::AppState;
use crate::fetch;
use crate::http::{self, QueryMap};
use crate::imaging::{self, CropRect, FitMode, ImagingError, OutputFormat, Quality};

/// Transform parameters extracted from the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResizeRequest {
    /// Target box; `None` means re-encode without resizing
    resize: Option<(u32, u32)>,
    fit: FitMode,
    format: OutputFormat,
    quality: Quality,
    crop: Option<CropRect>,
}

pub async fn handle_resize(query: &QueryMap, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let Some(url) = query.get("url") else {
        return http::build_error_response(StatusCode::BAD_REQUEST, "url parameter is required");
    };

    let request = match parse_request(query, state.config.image.default_quality) {
        Ok(r) => r,
        Err(message) => return http::build_error_response(StatusCode::BAD_REQUEST, &message),
    };

    let source = match fetch::fetch_image(
        &state.http_client,
        url,
        state.config.fetch.max_source_bytes,
    )
    .await
    {
        Ok(bytes) => bytes,
        Err(e) => return fetch_error_response("/resize", &e),
    };

    // info=true: describe the source instead of transforming it
    if query.is_true("info") {
        return match imaging::probe(&source) {
            Ok(info) => http::build_json_response(
                StatusCode::OK,
                &serde_json::json!({
                    "width": info.width,
                    "height": info.height,
                    "format": info.format,
                }),
            ),
            Err(e) => imaging_error_response("/resize", &e),
        };
    }

    let max_pixels = state.config.image.max_pixels;
    let outcome =
        tokio::task::spawn_blocking(move || transform(&source, &request, max_pixels)).await;

    match outcome {
        Ok(Ok(data)) => http::build_image_response(
            data,
            request.format.content_type(),
            state.config.http.cache_max_age,
        ),
        Ok(Err(e)) => imaging_error_response("/resize", &e),
        Err(e) => join_error_response("/resize", &e),
    }
}

/// Decode, crop, resize, and encode on a blocking thread.
fn transform(data: &[u8], request: &ResizeRequest, max_pixels: u64) -> Result<Vec<u8>, ImagingError> {
    let mut img = imaging::decode(data, max_pixels)?;

    if let Some(rect) = request.crop {
        img = imaging::crop(&img, rect)?;
    }

    if let Some((width, height)) = request.resize {
        img = imaging::resize(&img, width, height, request.fit);
    }

    imaging::encode(&img, request.format, request.quality)
}

fn parse_request(query: &QueryMap, default_quality: u8) -> Result<ResizeRequest, String> {
    let width = query.get_u32("width")?;
    let height = query.get_u32("height")?;
    let resize = match (width, height) {
        (Some(w), Some(h)) => {
            if w == 0 || h == 0 {
                return Err("width and height must be positive".to_string());
            }
            Some((w, h))
        }
        (None, None) => None,
        _ => return Err("width and height are required together".to_string()),
    };

    let fit = match query.get("fit") {
        None => FitMode::default(),
        Some(raw) => FitMode::parse(raw).ok_or_else(|| format!("unknown fit mode: {raw}"))?,
    };

    let format = match query.get("format") {
        None => OutputFormat::Jpeg,
        Some(raw) => OutputFormat::parse(raw).ok_or_else(|| format!("unknown format: {raw}"))?,
    };

    let quality = Quality::new(query.get_u8("quality")?.unwrap_or(default_quality));

    Ok(ResizeRequest {
        resize,
        fit,
        format,
        quality,
        crop: parse_crop(query)?,
    })
}

/// The crop step engages only when the full rectangle is present and
/// non-degenerate; a partial or zero-sized rectangle means no crop.
fn parse_crop(query: &QueryMap) -> Result<Option<CropRect>, String> {
    let x = query.get_u32("crop_x")?;
    let y = query.get_u32("crop_y")?;
    let width = query.get_u32("crop_width")?;
    let height = query.get_u32("crop_height")?;

    match (x, y, width, height) {
        (Some(x), Some(y), Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(Some(CropRect {
                x,
                y,
                width,
                height,
            }))
        }
        _ => Ok(None),
    }
}
