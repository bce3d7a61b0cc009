//! Derived bet-slip figures
//!
//! Pure functions over the current selections; recomputed on every read.

use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{BetType, Selection};

/// Aggregates shown under the slip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlipTotals {
    /// Product of all captured odds (0 for an empty slip)
    pub total_odds: Decimal,
    /// Amount wagered across the whole slip
    pub total_stake: Decimal,
    /// Return if every leg wins
    pub potential_payout: Decimal,
    /// Whether the slip is priced as a multi
    pub is_multi: bool,
}

/// Product of the selections' odds
///
/// An empty slip reports 0, not the multiplicative identity. The product
/// saturates at `Decimal::MAX`.
pub fn total_odds(selections: &[Selection]) -> Decimal {
    if selections.is_empty() {
        return Decimal::ZERO;
    }
    selections
        .iter()
        .fold(Decimal::ONE, |acc, s| acc.saturating_mul(s.odds))
}

/// Multi pricing applies only with the toggle set and at least 2 legs
pub fn is_effective_multi(bet_type: BetType, selection_count: usize) -> bool {
    bet_type == BetType::Multi && selection_count >= 2
}

/// Compute stake and payout for the current slip
///
/// Multi: one stake on the combined odds.
/// Singles: the same stake applied to every leg independently.
/// Every figure saturates at `Decimal::MAX` instead of overflowing.
pub fn compute_totals(selections: &[Selection], stake: Decimal, bet_type: BetType) -> SlipTotals {
    let total_odds = total_odds(selections);
    let is_multi = is_effective_multi(bet_type, selections.len());

    let (total_stake, potential_payout) = if is_multi {
        (stake, stake.saturating_mul(total_odds))
    } else {
        let count = Decimal::from(selections.len() as u64);
        let payout = selections
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.odds.saturating_mul(stake)));
        (stake.saturating_mul(count), payout)
    };

    SlipTotals {
        total_odds,
        total_stake,
        potential_payout,
        is_multi,
    }
}
