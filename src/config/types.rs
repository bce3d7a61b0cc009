//! Configuration types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sportsbook API endpoints and session token
    #[serde(default)]
    pub api: ApiConfig,
    /// Game feed fetching behaviour
    #[serde(default)]
    pub feed: FeedConfig,
    /// Bet slip defaults
    #[serde(default)]
    pub slip: SlipConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Sportsbook API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the REST API
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// WebSocket URL for push updates
    #[serde(default = "default_ws_url")]
    pub websocket_url: String,
    /// Session token issued by the auth service
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            websocket_url: default_ws_url(),
            auth_token: None,
        }
    }
}

fn default_rest_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_ws_url() -> String {
    "ws://localhost:5000".to_string()
}

/// Game feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Games requested per page for the upcoming and finished lists
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Seconds between background refreshes (0 disables polling)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Keep already-loaded games visible while a refresh is in flight or fails
    #[serde(default = "default_true")]
    pub keep_previous_data: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            poll_interval_seconds: default_poll_interval(),
            keep_previous_data: true,
        }
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_poll_interval() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Bet slip configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlipConfig {
    /// Stake pre-filled on a fresh slip
    #[serde(default)]
    pub default_stake: Decimal,
    /// Keep selections on the slip after a successful placement
    #[serde(default)]
    pub keep_selections_after_submit: bool,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Initial delay between reconnection attempts in milliseconds
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Upper bound for the reconnection backoff in milliseconds
    #[serde(default = "default_max_reconnect_delay")]
    pub max_reconnect_delay_ms: u64,
    /// Maximum reconnection attempts (0 = infinite)
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    /// Heartbeat/ping interval in seconds
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            reconnect_delay_ms: default_reconnect_delay(),
            max_reconnect_delay_ms: default_max_reconnect_delay(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reconnect_delay() -> u64 {
    1000
}

fn default_max_reconnect_delay() -> u64 {
    30_000
}

fn default_max_reconnect_attempts() -> u32 {
    5
}

fn default_heartbeat_interval() -> u64 {
    25
}

fn default_request_timeout() -> u64 {
    30
}
