// Application state module
// Per-process shared state: configuration plus the fetch client

use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::fetch;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Shared client for source image downloads
    pub http_client: reqwest::Client,

    // Cached config value for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    /// Create `AppState`, building the fetch client from configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http_client = fetch::build_client(&config.fetch)?;

        Ok(Self {
            config: config.clone(),
            http_client,
            cached_access_log: AtomicBool::new(config.logging.access_log),
        })
    }
}
