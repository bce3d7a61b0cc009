use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::errors::SlipError;
use crate::common::types::{BetLeg, Game, GameId, Outcome, PlacementReceipt};

/// Display-only snapshot of the teams at selection time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetails {
    pub home_team: String,
    pub away_team: String,
}

impl GameDetails {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
        }
    }

    pub fn from_game(game: &Game) -> Self {
        Self::new(game.home_team.name.clone(), game.away_team.name.clone())
    }
}

/// One leg of the bet slip
///
/// `odds` is captured when the selection is made and does not follow later
/// price changes on the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub game_id: GameId,
    pub game_details: GameDetails,
    pub outcome: Outcome,
    pub odds: Decimal,
}

impl Selection {
    pub fn new(
        game_id: impl Into<GameId>,
        game_details: GameDetails,
        outcome: Outcome,
        odds: Decimal,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            game_details,
            outcome,
            odds,
        }
    }

    /// Leg shape sent to the placement API
    pub fn to_leg(&self) -> BetLeg {
        BetLeg {
            game_id: self.game_id.clone(),
            outcome: self.outcome,
        }
    }
}

/// What an add/toggle did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlipChange {
    /// New game appended
    Added,
    /// Same game, different outcome: replaced in place
    Updated,
    /// Same game and outcome again: toggled off
    Removed,
    /// Nothing changed
    Rejected(SlipError),
}

impl SlipChange {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, SlipChange::Rejected(_))
    }
}

/// Bet type toggle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    #[default]
    Single,
    Multi,
}

impl std::fmt::Display for BetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BetType::Single => write!(f, "singles"),
            BetType::Multi => write!(f, "multi"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient user-facing notice (toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Change published to bet slip subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum SlipEvent {
    SelectionsChanged { count: usize },
    StakeChanged(Decimal),
    BetTypeChanged(BetType),
    Notice(Notification),
    Submitted(PlacementReceipt),
}

/// A slip leg resolved against the feed cache
#[derive(Debug, Clone, PartialEq)]
pub enum LegView {
    Available { selection: Selection, game: Game },
    /// The referenced game is not in the cache; render a placeholder
    Unavailable { selection: Selection },
}

impl LegView {
    pub fn selection(&self) -> &Selection {
        match self {
            LegView::Available { selection, .. } | LegView::Unavailable { selection } => selection,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, LegView::Available { .. })
    }
}
