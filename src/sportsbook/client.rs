//! Main sportsbook client that combines REST and WebSocket functionality

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, instrument};

use super::rest::SportsbookRestClient;
use super::websocket::{ReconnectBackoff, SportsbookWebSocketClient};
use crate::common::errors::{ClientError, Result};
use crate::common::traits::GameFeedClient;
use crate::common::types::GameEvent;
use crate::config::types::{ApiConfig, AppConfig, AppSettings};

/// Combined sportsbook client for the REST API and the push feed
pub struct SportsbookClient {
    /// REST API client
    rest_client: SportsbookRestClient,
    /// WebSocket client (created on connect)
    ws_client: Option<SportsbookWebSocketClient>,
    api: ApiConfig,
    settings: AppSettings,
}

impl SportsbookClient {
    /// Create a new client from configuration
    ///
    /// A token present in the configuration is applied to REST calls straight
    /// away; the push feed still waits for `connect`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.settings.request_timeout_seconds);
        let mut rest_client = SportsbookRestClient::with_timeout(&config.api.rest_url, timeout)?;
        rest_client.set_auth_token(config.api.auth_token.clone());

        Ok(Self {
            rest_client,
            ws_client: None,
            api: config.api.clone(),
            settings: config.settings.clone(),
        })
    }

    /// Get a reference to the REST client
    pub fn rest(&self) -> &SportsbookRestClient {
        &self.rest_client
    }

    /// Shared REST client for the feed synchronizer and bet placement
    pub fn rest_handle(&self) -> Arc<SportsbookRestClient> {
        Arc::new(self.rest_client.clone())
    }

    /// Whether a session has been opened with `connect`
    pub fn has_session(&self) -> bool {
        self.ws_client.is_some()
    }
}

#[async_trait]
impl GameFeedClient for SportsbookClient {
    #[instrument(skip(self, auth_token))]
    async fn connect(&mut self, auth_token: &str) -> Result<()> {
        if auth_token.trim().is_empty() {
            return Err(ClientError::Configuration(
                "Auth token must not be empty".to_string(),
            ));
        }
        if self.ws_client.is_some() {
            self.disconnect().await?;
        }

        info!("Creating sportsbook WebSocket client");
        self.rest_client.set_auth_token(Some(auth_token.to_string()));

        let ws_client = SportsbookWebSocketClient::new(&self.api.websocket_url)
            .with_auth_token(auth_token)
            .with_heartbeat_interval(self.settings.heartbeat_interval_seconds)
            .with_backoff(ReconnectBackoff::from_settings(&self.settings));
        self.ws_client = Some(ws_client);

        Ok(())
    }

    #[instrument(skip(self, sender))]
    async fn start(&mut self, sender: mpsc::Sender<GameEvent>) -> Result<()> {
        match self.ws_client.as_mut() {
            Some(ws_client) => ws_client.connect_and_listen(sender).await,
            None => Err(ClientError::NotConnected(
                "call connect before start".to_string(),
            )),
        }
    }

    #[instrument(skip(self))]
    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut ws_client) = self.ws_client.take() {
            ws_client.disconnect().await?;
        }
        self.rest_client.set_auth_token(None);
        info!("Disconnected from sportsbook");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.ws_client
            .as_ref()
            .map(|ws| ws.is_connected())
            .unwrap_or(false)
    }

    fn feed_name(&self) -> &'static str {
        "Sportsbook"
    }
}
