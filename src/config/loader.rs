//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{ApiConfig, AppConfig};
use crate::common::errors::{ClientError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__, e.g. APP__API__REST_URL)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ClientError::Configuration(e.to_string()))
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let defaults = ApiConfig::default();
    let api = ApiConfig {
        rest_url: std::env::var("SPORTSBOOK_REST_URL").unwrap_or(defaults.rest_url),
        websocket_url: std::env::var("SPORTSBOOK_WS_URL").unwrap_or(defaults.websocket_url),
        auth_token: std::env::var("SPORTSBOOK_AUTH_TOKEN")
            .ok()
            .filter(|t| !t.is_empty()),
    };

    let mut config = AppConfig {
        api,
        ..AppConfig::default()
    };

    if let Ok(page_size) = std::env::var("SPORTSBOOK_PAGE_SIZE") {
        config.feed.page_size = page_size
            .parse()
            .map_err(|e| ClientError::Configuration(format!("SPORTSBOOK_PAGE_SIZE: {}", e)))?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Some("does-not-exist.toml")).unwrap();
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.settings.request_timeout_seconds, 30);
    }

    #[test]
    fn test_load_from_env_reads_sportsbook_vars() {
        // No other test reads SPORTSBOOK_* variables
        std::env::set_var("SPORTSBOOK_REST_URL", "https://book.example.com/api");
        std::env::set_var("SPORTSBOOK_AUTH_TOKEN", "");
        std::env::set_var("SPORTSBOOK_PAGE_SIZE", "50");

        let config = load_from_env().unwrap();
        assert_eq!(config.api.rest_url, "https://book.example.com/api");
        assert_eq!(config.api.websocket_url, "ws://localhost:5000");
        assert!(config.api.auth_token.is_none());
        assert_eq!(config.feed.page_size, 50);

        std::env::set_var("SPORTSBOOK_PAGE_SIZE", "lots");
        assert!(matches!(load_from_env(), Err(ClientError::Configuration(_))));

        for var in ["SPORTSBOOK_REST_URL", "SPORTSBOOK_AUTH_TOKEN", "SPORTSBOOK_PAGE_SIZE"] {
            std::env::remove_var(var);
        }
    }
}
