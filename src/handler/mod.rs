//! Request handler module entry point

mod resize;
mod router;
mod upscale;

pub use router::handle_request;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::fetch::FetchError;
use crate::http;
use crate::imaging::ImagingError;
use crate::logger;

/// Map a source download failure to its HTTP response.
///
/// Every fetch failure is the caller's problem (bad URL, unreachable or
/// refusing upstream, oversized source), so all map to 400.
fn fetch_error_response(path: &str, err: &FetchError) -> Response<Full<Bytes>> {
    logger::log_handler_error(path, &err.to_string());
    http::build_error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

/// Map an imaging failure to its HTTP response.
fn imaging_error_response(path: &str, err: &ImagingError) -> Response<Full<Bytes>> {
    logger::log_handler_error(path, &err.to_string());
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    http::build_error_response(status, &err.to_string())
}

/// Fallback when the blocking transform task itself dies.
fn join_error_response(path: &str, err: &tokio::task::JoinError) -> Response<Full<Bytes>> {
    logger::log_handler_error(path, &format!("transform task failed: {err}"));
    http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "image processing failed")
}
