//! Trait definitions at the collaborator seams

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use super::errors::Result;
use super::types::{BetLeg, Bucket, Game, GameEvent, PlacementReceipt};

/// Page window for a bucket fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self { page: 1, limit }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(20)
    }
}

/// Source of the per-bucket game lists (REST API in production)
///
/// Each bucket is fetched independently so a failure in one never blocks
/// the others.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameListSource: Send + Sync {
    /// Fetch the games currently belonging to `bucket`
    async fn fetch_bucket(&self, bucket: Bucket, page: PageRequest) -> Result<Vec<Game>>;
}

/// External bet placement collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BetPlacementApi: Send + Sync {
    /// Place one multi-leg bet riding `stake` on the combined odds
    async fn place_multi_bet(&self, stake: Decimal, legs: Vec<BetLeg>) -> Result<PlacementReceipt>;

    /// Place one independent single per leg, each carrying `stake_per_bet`
    async fn place_single_bets(
        &self,
        stake_per_bet: Decimal,
        legs: Vec<BetLeg>,
    ) -> Result<PlacementReceipt>;
}

/// Trait for push-feed clients
///
/// The connection lifecycle follows the session: `connect` when a session is
/// established, `disconnect` on logout or expiry.
#[async_trait]
pub trait GameFeedClient: Send + Sync {
    /// Open the session with an auth token issued by the auth collaborator
    async fn connect(&mut self, auth_token: &str) -> Result<()>;

    /// Start receiving messages and forwarding them to the provided channel
    async fn start(&mut self, sender: mpsc::Sender<GameEvent>) -> Result<()>;

    /// Tear the session down; no events are forwarded afterwards
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if the client is currently connected
    fn is_connected(&self) -> bool;

    /// Get the name of the feed
    fn feed_name(&self) -> &'static str;
}

/// Trait for consumers of push events
pub trait GameEventHandler: Send + Sync {
    /// Handle an incoming game event
    fn handle_event(&mut self, event: &GameEvent);

    /// Called when a connection is established
    fn on_connect(&mut self) {}

    /// Called when a connection is lost
    fn on_disconnect(&mut self, _reason: Option<&str>) {}
}
