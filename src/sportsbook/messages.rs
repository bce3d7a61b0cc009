//! Sportsbook wire message types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::types::{BetLeg, Game, PlacementReceipt};

// ============================================================================
// WebSocket Messages
// ============================================================================

/// Push event name carrying a full game representation
pub const EVENT_GAME_UPDATE: &str = "gameUpdate";

/// Envelope of every push message: `{ "event": ..., "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

// ============================================================================
// REST API Response Types
// ============================================================================

/// Page metadata returned with game lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "pages")]
    pub total_pages: u32,
}

/// Response from GET /games and GET /games/live-feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesResponse {
    #[serde(default)]
    pub games: Option<Vec<Game>>,
    #[serde(default)]
    pub data: Option<Vec<Game>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl GamesResponse {
    pub fn into_games(self) -> Vec<Game> {
        self.games.or(self.data).unwrap_or_default()
    }
}

/// A bet record echoed back by the placement endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub potential_payout: Option<Decimal>,
}

/// Response from POST /bets/multi and POST /bets/singles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetPlacementResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub bet: Option<BetRecord>,
    #[serde(default)]
    pub bets: Vec<BetRecord>,
}

impl BetPlacementResponse {
    pub fn into_receipt(self) -> PlacementReceipt {
        let bet_ids = self
            .bet
            .into_iter()
            .chain(self.bets)
            .map(|b| b.id)
            .collect();
        PlacementReceipt {
            bet_ids,
            message: self.message,
        }
    }
}

/// Error body returned on non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Parse a body, tolerating non-JSON payloads
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

// ============================================================================
// REST API Request Types
// ============================================================================

/// Body of POST /bets/multi
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiBetRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub stake: Decimal,
    pub selections: Vec<BetLeg>,
}

/// Body of POST /bets/singles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SinglesBetRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub stake_per_bet: Decimal,
    pub selections: Vec<BetLeg>,
}
