// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, FetchConfig, HealthConfig, HttpConfig, ImageConfig, LoggingConfig, PerformanceConfig,
    RoutesConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the default "config.toml" location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "imgserve/0.1")?
            .set_default("http.enable_cors", true)?
            .set_default("http.cache_max_age", 31_536_000)?
            .set_default("fetch.connect_timeout", 10)?
            .set_default("fetch.request_timeout", 30)?
            .set_default("fetch.max_redirects", 10)?
            .set_default("fetch.max_source_bytes", 33_554_432)? // 32MB
            .set_default("fetch.user_agent", "imgserve/0.1")?
            .set_default("image.default_quality", 95)?
            .set_default("image.default_target_size", 4096)?
            .set_default("image.max_pixels", 120_000_000)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config_file() {
        let cfg = Config::load_from("nonexistent-config").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.http.enable_cors);
        assert_eq!(cfg.http.cache_max_age, 31_536_000);
        assert_eq!(cfg.fetch.max_source_bytes, 33_554_432);
        assert_eq!(cfg.image.default_quality, 95);
        assert_eq!(cfg.image.default_target_size, 4096);
        assert!(cfg.routes.health.enabled);
        assert_eq!(cfg.routes.health.liveness_path, "/healthz");
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let cfg = Config::load_from("nonexistent-config").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }
}
