//! Common test utilities and fixtures
#![allow(dead_code)]

use rust_decimal_macros::dec;
use sportsbook_client::common::types::{Game, GameStatus, MatchOdds, Scores, Team};
use sportsbook_client::slip::Selection;

pub const ARSENAL_CHELSEA: &str = "65f1c0a2b3c4d5e6f7a8b9c0";
pub const LAKERS_CELTICS: &str = "65f1c0a2b3c4d5e6f7a8b9c1";
pub const MADRID_BARCA: &str = "65f1c0a2b3c4d5e6f7a8b9c2";

/// Create a sample game for testing
pub fn sample_game(id: &str, home: &str, away: &str, status: GameStatus) -> Game {
    Game {
        id: id.to_string(),
        home_team: Team::new(home),
        away_team: Team::new(away),
        league: Some("Premier League".to_string()),
        match_date: None,
        status,
        odds: MatchOdds::new(dec!(2.10), dec!(3.40), dec!(3.20)),
        scores: match status {
            GameStatus::Upcoming => None,
            _ => Some(Scores { home: 1, away: 0 }),
        },
    }
}

pub fn upcoming_game() -> Game {
    sample_game(ARSENAL_CHELSEA, "Arsenal", "Chelsea", GameStatus::Upcoming)
}

pub fn live_game() -> Game {
    sample_game(LAKERS_CELTICS, "Lakers", "Celtics", GameStatus::Live)
}

/// A selection on `game` backing the home side
pub fn home_selection(game: &Game) -> Selection {
    Selection::new(
        game.id.clone(),
        sportsbook_client::slip::GameDetails::from_game(game),
        sportsbook_client::Outcome::HomeWin,
        game.odds.home.unwrap_or(dec!(1)),
    )
}

/// Sample REST bodies for testing
pub mod rest_bodies {
    /// GET /games?status=upcoming
    pub const UPCOMING: &str = r#"{
        "games": [
            {
                "_id": "65f1c0a2b3c4d5e6f7a8b9c0",
                "homeTeam": {"name": "Arsenal", "logo": "https://cdn.example.com/ars.png"},
                "awayTeam": {"name": "Chelsea"},
                "league": "Premier League",
                "matchDate": "2026-10-18T14:00:00Z",
                "status": "upcoming",
                "odds": {"home": 2.1, "draw": 3.4, "away": 3.2}
            },
            {
                "_id": "65f1c0a2b3c4d5e6f7a8b9cf",
                "homeTeam": {"name": "Everton"},
                "awayTeam": {"name": "Fulham"},
                "status": "cancelled"
            }
        ],
        "pagination": {"page": 1, "limit": 20, "total": 2, "pages": 1}
    }"#;

    /// GET /games/live-feed
    pub const LIVE: &str = r#"{
        "data": [
            {
                "_id": "65f1c0a2b3c4d5e6f7a8b9c1",
                "homeTeam": {"name": "Lakers"},
                "awayTeam": {"name": "Celtics"},
                "league": "NBA",
                "status": "live",
                "odds": {"home": 1.8, "away": 2.05},
                "scores": {"home": 54, "away": 50}
            }
        ]
    }"#;

    pub const SERVER_ERROR: &str = r#"{"message": "Internal server error"}"#;
}

/// Sample WebSocket messages for testing parsing
pub mod ws_messages {
    /// The upcoming Arsenal game kicking off
    pub const ARSENAL_KICKOFF: &str = r#"{
        "event": "gameUpdate",
        "data": {
            "_id": "65f1c0a2b3c4d5e6f7a8b9c0",
            "homeTeam": {"name": "Arsenal"},
            "awayTeam": {"name": "Chelsea"},
            "status": "live",
            "odds": {"home": 1.95, "draw": 3.5, "away": 3.6},
            "scores": {"home": 0, "away": 0}
        }
    }"#;

    pub const UNKNOWN_EVENT: &str = r#"{"event": "walletUpdate", "data": {"balance": 10}}"#;
}
