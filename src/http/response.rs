//! HTTP response building module
//!
//! Provides builders for the service's response shapes, decoupled from
//! handler logic. CORS and Server headers are applied centrally by the
//! router after dispatch.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Build JSON response
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error",
            );
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", json.len())
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error("JSON", &e);
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// Build error response with `{"error": message}` JSON body
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Content-Length", body.len())
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("error", &e);
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// Build success response carrying transformed image bytes
pub fn build_image_response(
    data: Vec<u8>,
    content_type: &str,
    cache_max_age: u32,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Cache-Control", format!("public, max-age={cache_max_age}"))
        .body(Full::new(Bytes::from(data)))
        .unwrap_or_else(|e| {
            log_build_error("image", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build OPTIONS response (CORS preflight)
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_not_found_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, "not found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "application/json")
        .header("Allow", "GET, OPTIONS")
        .body(Full::new(Bytes::from(r#"{"error":"method not allowed"}"#)))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build health check response
pub fn build_health_response(status: &str) -> Response<Full<Bytes>> {
    build_json_response(StatusCode::OK, &serde_json::json!({ "status": status }))
}

/// Log response build error
fn log_build_error(kind: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {kind} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_carries_json_body() {
        let resp = build_error_response(StatusCode::BAD_REQUEST, "url parameter is required");
        assert_eq!(resp.status(), 400);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn image_response_sets_cache_and_type() {
        let resp = build_image_response(vec![1, 2, 3], "image/png", 31_536_000);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Type").unwrap(), "image/png");
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "3");
        assert_eq!(
            resp.headers().get("Cache-Control").unwrap(),
            "public, max-age=31536000"
        );
    }

    #[test]
    fn options_response_has_no_body() {
        let resp = build_options_response();
        assert_eq!(resp.status(), 200);
    }

    #[test]
    fn method_not_allowed_lists_allowed_methods() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers().get("Allow").unwrap(), "GET, OPTIONS");
    }
}
