//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! dispatch, CORS header assembly, and access logging.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::http::{self, QueryMap};
use crate::logger::{self, AccessLogEntry};

use super::{resize, upscale};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().to_string();
    let uri = req.uri().clone();
    let version = req.version();
    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    let mut response = dispatch(&req, &state).await;

    if state.config.http.enable_cors {
        apply_cors(&mut response);
    }
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert("Server", server);
    }

    if state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed)
    {
        let mut entry =
            AccessLogEntry::new(peer_addr.ip().to_string(), method, uri.path().to_string());
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_name(version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method and path
async fn dispatch<B>(req: &Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    match *req.method() {
        Method::GET => {}
        Method::OPTIONS => return http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {}", req.method()));
            return http::build_405_response();
        }
    }

    let path = req.uri().path();

    // 2. Health check endpoints (always fast, no fetch)
    let health = &state.config.routes.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    // 3. Transform endpoints
    let query = QueryMap::from_uri(req.uri());
    match path {
        "/resize" => resize::handle_resize(&query, state).await,
        "/upscale" => upscale::handle_upscale(&query, state).await,
        _ => http::build_not_found_response(),
    }
}

/// Grant unrestricted CORS on the outgoing response
fn apply_cors(response: &mut Response<Full<Bytes>>) {
    let headers = response.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type"),
    );
}

fn header_string<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_name(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_state() -> Arc<AppState> {
        let config = Config::load_from("nonexistent-config").unwrap();
        Arc::new(AppState::new(&config).unwrap())
    }

    fn request(method: Method, path: &str) -> Request<()> {
        Request::builder().method(method).uri(path).body(()).unwrap()
    }

    #[tokio::test]
    async fn options_preflight_returns_200() {
        let resp = dispatch(&request(Method::OPTIONS, "/resize"), &test_state()).await;
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn post_is_rejected_with_405() {
        let resp = dispatch(&request(Method::POST, "/resize"), &test_state()).await;
        assert_eq!(resp.status(), 405);
    }

    #[tokio::test]
    async fn health_endpoints_answer_ok() {
        let state = test_state();
        let live = dispatch(&request(Method::GET, "/healthz"), &state).await;
        assert_eq!(live.status(), 200);
        let ready = dispatch(&request(Method::GET, "/readyz"), &state).await;
        assert_eq!(ready.status(), 200);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let resp = dispatch(&request(Method::GET, "/thumbnails"), &test_state()).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn resize_without_url_is_400() {
        let resp = dispatch(&request(Method::GET, "/resize"), &test_state()).await;
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn upscale_without_url_is_400() {
        let resp = dispatch(&request(Method::GET, "/upscale?targetSize=2048"), &test_state()).await;
        assert_eq!(resp.status(), 400);
    }

    #[test]
    fn version_names() {
        assert_eq!(version_name(Version::HTTP_11), "1.1");
        assert_eq!(version_name(Version::HTTP_10), "1.0");
        assert_eq!(version_name(Version::HTTP_2), "2");
    }
}
