//! Bet slip module
//!
//! # Components
//!
//! - [`SelectionStore`]: ordered legs, one per game, capped at [`MAX_SELECTIONS`]
//! - [`totals`]: pure odds/stake/payout computation
//! - [`BetSlip`]: stake, bet-type toggle, notices and submission on top of the store
//!
//! ```text
//! view intent ──► BetSlip ──► SelectionStore
//!                    │
//!                    ├──► totals::compute_totals ──► SlipTotals
//!                    └──► broadcast<SlipEvent> ──► subscribers
//! ```

mod bet_slip;
mod store;
pub mod totals;
mod types;

pub use bet_slip::{BetSlip, GENERIC_SUBMIT_FAILURE};
pub use store::{SelectionStore, MAX_SELECTIONS};
pub use totals::{compute_totals, total_odds, SlipTotals};
pub use types::{
    BetType, GameDetails, LegView, Notification, NotificationLevel, Selection, SlipChange,
    SlipEvent,
};
