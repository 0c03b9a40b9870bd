//! Remote image fetching
//!
//! One shared `reqwest` client per process, built from the `[fetch]` config
//! section. Redirects are followed up to the configured cap and the source
//! size limit is enforced both against Content-Length and the downloaded
//! body.

use std::time::Duration;

use hyper::body::Bytes;
use reqwest::{redirect, Client};
use thiserror::Error;

use crate::config::FetchConfig;

/// Errors that can occur while downloading a source image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream responded with a non-success status
    #[error("failed to fetch: {0}")]
    Status(u16),

    /// Source exceeds the configured size limit
    #[error("source too large: {size} bytes (max {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// Transport-level failure (DNS, TLS, timeout, too many redirects)
    #[error("failed to fetch: {0}")]
    Request(#[from] reqwest::Error),
}

/// Build the shared HTTP client from configuration.
pub fn build_client(config: &FetchConfig) -> reqwest::Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .timeout(Duration::from_secs(config.request_timeout))
        .redirect(redirect::Policy::limited(config.max_redirects))
        .user_agent(&config.user_agent)
        .build()
}

/// Download the source image bytes, enforcing `max_bytes`.
pub async fn fetch_image(client: &Client, url: &str, max_bytes: u64) -> Result<Bytes, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    // Content-Length is advisory; the body is re-checked after download
    if let Some(len) = response.content_length() {
        if len > max_bytes {
            return Err(FetchError::TooLarge {
                size: len,
                limit: max_bytes,
            });
        }
    }

    let body = response.bytes().await?;
    let size = u64::try_from(body.len()).unwrap_or(u64::MAX);
    if size > max_bytes {
        return Err(FetchError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mirrors_upstream_code() {
        let err = FetchError::Status(404);
        assert_eq!(err.to_string(), "failed to fetch: 404");
    }

    #[test]
    fn too_large_error_names_both_sizes() {
        let err = FetchError::TooLarge {
            size: 50,
            limit: 10,
        };
        assert_eq!(err.to_string(), "source too large: 50 bytes (max 10)");
    }

    #[test]
    fn build_client_with_defaults() {
        let config = FetchConfig {
            connect_timeout: 10,
            request_timeout: 30,
            max_redirects: 10,
            max_source_bytes: 33_554_432,
            user_agent: "imgserve/0.1".to_string(),
        };
        assert!(build_client(&config).is_ok());
    }
}
