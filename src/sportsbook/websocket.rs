//! WebSocket client for sportsbook push updates

use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::messages::*;
use crate::common::errors::{ClientError, Result};
use crate::common::types::{ConnectionStatus, Game, GameEvent};
use crate::config::types::AppSettings;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Exponential reconnection backoff
///
/// Delay is `initial * 2^attempt`, capped at `max`; `max_attempts` of `None`
/// retries forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectBackoff {
    pub initial: Duration,
    pub max: Duration,
    pub max_attempts: Option<u32>,
}

impl ReconnectBackoff {
    pub fn new(initial: Duration, max: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            initial,
            max,
            max_attempts,
        }
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        let max_attempts = match settings.max_reconnect_attempts {
            0 => None,
            n => Some(n),
        };
        Self::new(
            Duration::from_millis(settings.reconnect_delay_ms),
            Duration::from_millis(settings.max_reconnect_delay_ms),
            max_attempts,
        )
    }

    /// Delay before reconnect attempt `attempt` (0-indexed), or `None` to give up
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if let Some(max) = self.max_attempts {
            if attempt >= max {
                return None;
            }
        }
        let factor = 2u32.saturating_pow(attempt);
        Some(self.initial.saturating_mul(factor).min(self.max))
    }
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::from_settings(&AppSettings::default())
    }
}

/// Why a single connection stopped
enum SessionEnd {
    Shutdown,
    ReceiverGone,
    Lost(Option<String>),
}

/// WebSocket client for game push updates
pub struct SportsbookWebSocketClient {
    /// WebSocket base URL
    url: String,
    /// Session token appended as `?token=`
    auth_token: Option<String>,
    /// Heartbeat interval in seconds
    heartbeat_interval: u64,
    /// Reconnection policy
    backoff: ReconnectBackoff,
    /// Connected state flag
    is_connected: Arc<AtomicBool>,
    /// Signals the background task to stop
    shutdown: Option<watch::Sender<bool>>,
    /// Background connection task
    task: Option<JoinHandle<()>>,
}

impl SportsbookWebSocketClient {
    /// Create a new WebSocket client for the game feed
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            auth_token: None,
            heartbeat_interval: 25,
            backoff: ReconnectBackoff::default(),
            is_connected: Arc::new(AtomicBool::new(false)),
            shutdown: None,
            task: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the heartbeat interval
    pub fn with_heartbeat_interval(mut self, seconds: u64) -> Self {
        self.heartbeat_interval = seconds;
        self
    }

    pub fn with_backoff(mut self, backoff: ReconnectBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    /// Whether a background task is still running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Full endpoint URL including the session token
    pub fn endpoint(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/ws", self.url))
            .map_err(|e| ClientError::Configuration(format!("Invalid WebSocket URL: {}", e)))?;
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url)
    }

    /// Connect and start forwarding events
    ///
    /// The first connection must succeed; afterwards dropped connections are
    /// retried in the background according to the backoff policy.
    #[instrument(skip(self, event_sender))]
    pub async fn connect_and_listen(&mut self, event_sender: mpsc::Sender<GameEvent>) -> Result<()> {
        if self.is_running() {
            return Err(ClientError::WebSocketConnection(
                "Already listening".to_string(),
            ));
        }

        let endpoint = self.endpoint()?;
        info!("Connecting to sportsbook WebSocket: {}/ws", self.url);

        let (ws_stream, _response) = connect_async(endpoint.as_str())
            .await
            .map_err(|e| ClientError::WebSocketConnection(e.to_string()))?;

        info!("WebSocket connection established");
        self.is_connected.store(true, Ordering::SeqCst);

        let _ = event_sender
            .send(GameEvent::ConnectionStatus(ConnectionStatus::Connected))
            .await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.shutdown = Some(shutdown_tx);

        let supervisor = Supervisor {
            endpoint,
            events: event_sender,
            heartbeat: Duration::from_secs(self.heartbeat_interval.max(1)),
            backoff: self.backoff.clone(),
            is_connected: self.is_connected.clone(),
            shutdown: shutdown_rx,
        };
        self.task = Some(tokio::spawn(supervisor.run(ws_stream)));

        Ok(())
    }

    /// Close the connection and stop the background task
    ///
    /// Once this returns the event sender has been dropped; no further
    /// events are delivered.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| ClientError::Internal(format!("WebSocket task failed: {}", e)))?;
        }
        self.is_connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Parse an incoming WebSocket message into a GameEvent
    pub fn parse_message(text: &str) -> Result<GameEvent> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("pong") {
            return Ok(GameEvent::Heartbeat);
        }

        let envelope: WsEnvelope = serde_json::from_str(trimmed)?;
        match envelope.event.as_str() {
            EVENT_GAME_UPDATE => {
                let game: Game = serde_json::from_value(envelope.data)?;
                Ok(GameEvent::GameUpdate(game))
            }
            "pong" | "heartbeat" => Ok(GameEvent::Heartbeat),
            _ => Ok(GameEvent::Raw(text.to_string())),
        }
    }
}

impl Drop for SportsbookWebSocketClient {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Owns the live connection and reconnects it when it drops
struct Supervisor {
    endpoint: Url,
    events: mpsc::Sender<GameEvent>,
    heartbeat: Duration,
    backoff: ReconnectBackoff,
    is_connected: Arc<AtomicBool>,
    shutdown: watch::Receiver<bool>,
}

impl Supervisor {
    async fn run(mut self, mut ws: WsStream) {
        loop {
            match self.run_session(&mut ws).await {
                SessionEnd::Shutdown => {
                    info!("WebSocket closed by client");
                    let _ = ws.close(None).await;
                    break;
                }
                SessionEnd::ReceiverGone => {
                    warn!("Event receiver dropped, closing WebSocket");
                    let _ = ws.close(None).await;
                    break;
                }
                SessionEnd::Lost(reason) => {
                    self.is_connected.store(false, Ordering::SeqCst);
                    self.emit(GameEvent::ConnectionStatus(ConnectionStatus::Disconnected(reason)))
                        .await;

                    match self.reconnect().await {
                        Some(next) => {
                            ws = next;
                            self.is_connected.store(true, Ordering::SeqCst);
                            self.emit(GameEvent::ConnectionStatus(ConnectionStatus::Connected))
                                .await;
                        }
                        None => break,
                    }
                }
            }
        }
        self.is_connected.store(false, Ordering::SeqCst);
    }

    async fn run_session(&mut self, ws: &mut WsStream) -> SessionEnd {
        let mut ping = interval_at(Instant::now() + self.heartbeat, self.heartbeat);

        loop {
            tokio::select! {
                _ = stopped(&mut self.shutdown) => return SessionEnd::Shutdown,
                _ = ping.tick() => {
                    if let Err(e) = ws.send(Message::Ping(Vec::new())).await {
                        return SessionEnd::Lost(Some(e.to_string()));
                    }
                }
                msg = ws.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            let event = match SportsbookWebSocketClient::parse_message(&text) {
                                Ok(event) => event,
                                Err(e) => {
                                    warn!("Failed to parse message: {} - {}", e, text);
                                    GameEvent::Raw(text)
                                }
                            };
                            if let Err(end) = self.forward(event).await {
                                return end;
                            }
                        }
                        Some(Ok(Message::Pong(_))) => {
                            debug!("Received Pong");
                            if let Err(end) = self.forward(GameEvent::Heartbeat).await {
                                return end;
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            info!("WebSocket closed: {:?}", frame);
                            return SessionEnd::Lost(frame.map(|f| f.reason.to_string()));
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            error!("WebSocket error: {}", e);
                            return SessionEnd::Lost(Some(e.to_string()));
                        }
                        None => {
                            info!("WebSocket stream ended");
                            return SessionEnd::Lost(None);
                        }
                    }
                }
            }
        }
    }

    async fn reconnect(&mut self) -> Option<WsStream> {
        let mut attempt = 0u32;
        while let Some(delay) = self.backoff.next_delay(attempt) {
            attempt += 1;
            self.emit(GameEvent::ConnectionStatus(ConnectionStatus::Reconnecting { attempt }))
                .await;

            tokio::select! {
                _ = stopped(&mut self.shutdown) => return None,
                _ = sleep(delay) => {}
            }

            match connect_async(self.endpoint.as_str()).await {
                Ok((ws, _)) => {
                    info!(attempt, "WebSocket reconnected");
                    return Some(ws);
                }
                Err(e) => warn!(attempt, "Reconnect failed: {}", e),
            }
        }

        error!("Giving up on WebSocket after {} attempts", attempt);
        self.emit(GameEvent::ConnectionStatus(ConnectionStatus::Error(
            "Reconnect attempts exhausted".to_string(),
        )))
        .await;
        None
    }

    /// Deliver an event, giving up if shutdown is requested while the
    /// receiver is full
    async fn forward(&mut self, event: GameEvent) -> std::result::Result<(), SessionEnd> {
        tokio::select! {
            biased;
            _ = stopped(&mut self.shutdown) => Err(SessionEnd::Shutdown),
            sent = self.events.send(event) => sent.map_err(|_| SessionEnd::ReceiverGone),
        }
    }

    async fn emit(&mut self, event: GameEvent) {
        let _ = self.forward(event).await;
    }
}

/// Resolves once the client has asked the task to stop
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
