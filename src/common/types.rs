//! Unified types shared by the feed, the bet slip and the transport clients

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque game identifier as issued by the server
pub type GameId = String;

/// Length of a well-formed game id (hex object id)
pub const GAME_ID_LEN: usize = 24;

/// Check that an id looks like a 24-character hexadecimal object id
///
/// This is a presentation guard run before an odds click is accepted.
/// The selection store itself stores whatever id it is given.
pub fn is_valid_game_id(id: &str) -> bool {
    id.len() == GAME_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Match outcome a selection backs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "A")]
    HomeWin,
    #[serde(rename = "Draw")]
    Draw,
    #[serde(rename = "B")]
    AwayWin,
}

impl Outcome {
    /// Short label shown on odds buttons
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::HomeWin => "1",
            Outcome::Draw => "X",
            Outcome::AwayWin => "2",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::HomeWin => write!(f, "home win"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::AwayWin => write!(f, "away win"),
        }
    }
}

/// Server-side lifecycle state of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Upcoming,
    Live,
    Finished,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl GameStatus {
    /// Bucket a game with this status belongs to, if any
    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            GameStatus::Upcoming => Some(Bucket::Upcoming),
            GameStatus::Live => Some(Bucket::Live),
            GameStatus::Finished => Some(Bucket::Finished),
            GameStatus::Cancelled | GameStatus::Unknown => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::Upcoming => write!(f, "upcoming"),
            GameStatus::Live => write!(f, "live"),
            GameStatus::Finished => write!(f, "finished"),
            GameStatus::Cancelled => write!(f, "cancelled"),
            GameStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Mutually exclusive grouping of games held by the feed cache
///
/// Ordered by lifecycle: upcoming < live < finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Upcoming,
    Live,
    Finished,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Upcoming, Bucket::Live, Bucket::Finished];
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bucket::Upcoming => write!(f, "upcoming"),
            Bucket::Live => write!(f, "live"),
            Bucket::Finished => write!(f, "finished"),
        }
    }
}

/// Team metadata attached to a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logo: None,
        }
    }
}

/// Decimal odds for the three match outcomes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOdds {
    #[serde(default)]
    pub home: Option<Decimal>,
    #[serde(default)]
    pub draw: Option<Decimal>,
    #[serde(default)]
    pub away: Option<Decimal>,
}

impl MatchOdds {
    pub fn new(home: Decimal, draw: Decimal, away: Decimal) -> Self {
        Self {
            home: Some(home),
            draw: Some(draw),
            away: Some(away),
        }
    }

    /// Odds offered for an outcome; missing or non-positive odds are not offered
    pub fn for_outcome(&self, outcome: Outcome) -> Option<Decimal> {
        let odds = match outcome {
            Outcome::HomeWin => self.home,
            Outcome::Draw => self.draw,
            Outcome::AwayWin => self.away,
        };
        odds.filter(|o| *o > Decimal::ZERO)
    }
}

/// Current score line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default)]
    pub home: u32,
    #[serde(default)]
    pub away: u32,
}

/// Read-only projection of a game as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(rename = "_id", alias = "id")]
    pub id: GameId,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub match_date: Option<DateTime<Utc>>,
    pub status: GameStatus,
    #[serde(default)]
    pub odds: MatchOdds,
    #[serde(default)]
    pub scores: Option<Scores>,
}

impl Game {
    /// Bucket this game belongs in according to its own status
    pub fn bucket(&self) -> Option<Bucket> {
        self.status.bucket()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} vs {}", self.home_team.name, self.away_team.name)?;
        if let Some(scores) = self.scores {
            write!(f, " {}-{}", scores.home, scores.away)?;
        }
        write!(f, " [{}]", self.status)
    }
}

/// One leg handed to the bet placement API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetLeg {
    pub game_id: GameId,
    pub outcome: Outcome,
}

/// Result of a successful bet placement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementReceipt {
    /// Identifiers of the bets created (one for a multi, one per single)
    pub bet_ids: Vec<String>,
    /// Optional confirmation text from the server
    pub message: Option<String>,
}

/// Connection status for the push channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// Successfully connected
    Connected,
    /// Disconnected (with optional reason)
    Disconnected(Option<String>),
    /// Attempting to reconnect
    Reconnecting { attempt: u32 },
    /// Connection error
    Error(String),
}

/// Event delivered over the push channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Full current representation of a single game
    GameUpdate(Game),
    /// Connection status change
    ConnectionStatus(ConnectionStatus),
    /// Heartbeat/pong from the server
    Heartbeat,
    /// Raw/unknown message (for debugging)
    Raw(String),
}
