//! Error types for the application

use thiserror::Error;

/// Result type alias using our ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// WebSocket connection errors
    #[error("WebSocket connection error: {0}")]
    WebSocketConnection(String),

    /// WebSocket send/receive errors
    #[error("WebSocket communication error: {0}")]
    WebSocketCommunication(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Bet placement refused by the server
    #[error("Bet rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    BetRejected {
        status: u16,
        message: Option<String>,
    },

    /// Local bet-slip validation failure
    #[error(transparent)]
    Slip(#[from] SlipError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No active session for an operation that needs one
    #[error("Not connected: {0}")]
    NotConnected(String),

    /// Channel send errors
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Server-provided message for a rejected placement, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::BetRejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::WebSocketCommunication(err.to_string())
    }
}

/// Validation rejections raised by the bet slip
///
/// These never mutate state; callers surface them as transient notices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlipError {
    #[error("Maximum of {max} selections reached")]
    SelectionLimit { max: usize },

    #[error("Multi bets need at least 2 selections (have {count})")]
    MultiRequiresSelections { count: usize },

    #[error("Bet slip is empty")]
    EmptySlip,

    #[error("Invalid stake: {0}")]
    InvalidStake(String),

    #[error("Invalid game id: {0}")]
    InvalidGameId(String),

    #[error("No odds available for {outcome} on game {game_id}")]
    OddsUnavailable { game_id: String, outcome: String },
}
