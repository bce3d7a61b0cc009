//! Sportsbook Client Library
//!
//! Headless client core for a sports-betting front end: a bet slip with
//! derived odds and payout, and a game feed cache kept in step with the
//! sportsbook over REST and WebSocket.

pub mod common;
pub mod config;
pub mod feed;
pub mod slip;
pub mod sportsbook;

// Re-export commonly used types
pub use common::errors::{ClientError, Result, SlipError};
pub use common::types::{
    BetLeg, Bucket, ConnectionStatus, Game, GameEvent, GameId, GameStatus, MatchOdds, Outcome,
    PlacementReceipt, Scores, Team,
};
pub use config::types::AppConfig;
pub use feed::{FeedEvent, FeedSynchronizer, GameFeedCache, RefreshMode, SharedFeedCache};
pub use slip::{BetSlip, BetType, Selection, SlipChange, SlipEvent, SlipTotals};
pub use sportsbook::client::SportsbookClient;
pub use sportsbook::rest::SportsbookRestClient;
pub use sportsbook::websocket::SportsbookWebSocketClient;
