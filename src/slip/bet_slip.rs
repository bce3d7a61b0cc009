//! Bet slip: selections, stake and bet type behind the user intents

use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::store::SelectionStore;
use super::totals::{compute_totals, is_effective_multi, SlipTotals};
use super::types::{
    BetType, GameDetails, LegView, Notification, Selection, SlipChange, SlipEvent,
};
use crate::common::channels::DEFAULT_BROADCAST_CAPACITY;
use crate::common::errors::{Result, SlipError};
use crate::common::traits::BetPlacementApi;
use crate::common::types::{is_valid_game_id, Game, Outcome, PlacementReceipt};
use crate::config::types::SlipConfig;
use crate::feed::GameFeedCache;

/// Shown when a placement fails without a server message
pub const GENERIC_SUBMIT_FAILURE: &str = "Failed to place bet. Please try again.";

/// The user's candidate bet
///
/// State changes and notices are published to subscribers; a view layer
/// re-renders from them, tests read them directly.
pub struct BetSlip {
    store: SelectionStore,
    stake: Decimal,
    bet_type: BetType,
    keep_selections_after_submit: bool,
    events: broadcast::Sender<SlipEvent>,
}

impl Default for BetSlip {
    fn default() -> Self {
        Self::new()
    }
}

impl BetSlip {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);
        Self {
            store: SelectionStore::new(),
            stake: Decimal::ZERO,
            bet_type: BetType::Single,
            keep_selections_after_submit: false,
            events,
        }
    }

    pub fn from_config(config: &SlipConfig) -> Self {
        let mut slip = Self::new();
        slip.stake = config.default_stake.max(Decimal::ZERO);
        slip.keep_selections_after_submit = config.keep_selections_after_submit;
        slip
    }

    /// Subscribe to slip changes and notices
    pub fn subscribe(&self) -> broadcast::Receiver<SlipEvent> {
        self.events.subscribe()
    }

    pub fn selections(&self) -> &[Selection] {
        self.store.selections()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn stake(&self) -> Decimal {
        self.stake
    }

    pub fn bet_type(&self) -> BetType {
        self.bet_type
    }

    /// Outcome currently selected for a game, for highlighting odds buttons
    pub fn selected_outcome(&self, game_id: &str) -> Option<Outcome> {
        self.store.get(game_id).map(|s| s.outcome)
    }

    pub fn totals(&self) -> SlipTotals {
        compute_totals(self.store.selections(), self.stake, self.bet_type)
    }

    /// Add, switch or toggle off a selection
    ///
    /// Adding and switching raise a notice; toggling off is silent.
    pub fn add_or_toggle(&mut self, selection: Selection) -> SlipChange {
        let details = selection.game_details.clone();
        let change = self.store.add_or_toggle(selection);

        match &change {
            SlipChange::Added => self.notify(Notification::success(format!(
                "Added {} vs {} to bet slip",
                details.home_team, details.away_team
            ))),
            SlipChange::Updated => self.notify(Notification::success(format!(
                "Updated selection for {} vs {}",
                details.home_team, details.away_team
            ))),
            SlipChange::Removed => {}
            SlipChange::Rejected(err) => self.notify(Notification::warning(err.to_string())),
        }

        if change.is_mutation() {
            self.selections_changed();
        }
        change
    }

    /// Odds-button intent: guard the id, capture current odds, then add/toggle
    pub fn select_odds(&mut self, game: &Game, outcome: Outcome) -> SlipChange {
        if !is_valid_game_id(&game.id) {
            warn!(game_id = %game.id, "Rejected odds click for malformed game id");
            let err = SlipError::InvalidGameId(game.id.clone());
            self.notify(Notification::warning("Invalid game ID"));
            return SlipChange::Rejected(err);
        }

        let Some(odds) = game.odds.for_outcome(outcome) else {
            let err = SlipError::OddsUnavailable {
                game_id: game.id.clone(),
                outcome: outcome.to_string(),
            };
            self.notify(Notification::warning(err.to_string()));
            return SlipChange::Rejected(err);
        };

        self.add_or_toggle(Selection::new(
            game.id.clone(),
            GameDetails::from_game(game),
            outcome,
            odds,
        ))
    }

    /// Remove the selection for a game; absent ids are a no-op
    pub fn remove(&mut self, game_id: &str) -> bool {
        let removed = self.store.remove(game_id);
        if removed {
            self.notify(Notification::info("Selection removed from bet slip"));
            self.selections_changed();
        }
        removed
    }

    pub fn clear(&mut self) {
        let had_selections = !self.store.is_empty();
        self.store.clear();
        if had_selections {
            self.notify(Notification::info("Bet slip cleared"));
        }
        self.selections_changed();
    }

    pub fn set_stake(&mut self, stake: Decimal) -> std::result::Result<(), SlipError> {
        if stake < Decimal::ZERO {
            return Err(SlipError::InvalidStake(stake.to_string()));
        }
        if stake != self.stake {
            self.stake = stake;
            self.publish(SlipEvent::StakeChanged(stake));
        }
        Ok(())
    }

    /// Switch between singles and multi
    ///
    /// Multi needs at least 2 selections; back to singles always succeeds.
    pub fn set_bet_type(&mut self, bet_type: BetType) -> std::result::Result<(), SlipError> {
        if bet_type == BetType::Multi && self.store.len() < 2 {
            let err = SlipError::MultiRequiresSelections {
                count: self.store.len(),
            };
            self.notify(Notification::warning(err.to_string()));
            return Err(err);
        }
        self.switch_bet_type(bet_type);
        Ok(())
    }

    /// Pair each selection with its cached game, or mark it unavailable
    pub fn resolve_legs(&self, cache: &GameFeedCache) -> Vec<LegView> {
        self.store
            .selections()
            .iter()
            .map(|selection| match cache.find(&selection.game_id) {
                Some(game) => LegView::Available {
                    selection: selection.clone(),
                    game: game.clone(),
                },
                None => LegView::Unavailable {
                    selection: selection.clone(),
                },
            })
            .collect()
    }

    /// Submit using the configured post-submit behaviour
    pub async fn submit_with_defaults(
        &mut self,
        api: &dyn BetPlacementApi,
    ) -> Result<PlacementReceipt> {
        let keep = self.keep_selections_after_submit;
        self.submit(api, keep).await
    }

    /// Hand the slip to the placement API
    ///
    /// On failure the slip is left untouched so the user can retry.
    pub async fn submit(
        &mut self,
        api: &dyn BetPlacementApi,
        keep_selections: bool,
    ) -> Result<PlacementReceipt> {
        if self.store.is_empty() {
            self.notify(Notification::warning(SlipError::EmptySlip.to_string()));
            return Err(SlipError::EmptySlip.into());
        }
        if self.stake <= Decimal::ZERO {
            let err = SlipError::InvalidStake(self.stake.to_string());
            self.notify(Notification::warning("Please enter a stake"));
            return Err(err.into());
        }

        let legs: Vec<_> = self.store.selections().iter().map(Selection::to_leg).collect();
        let leg_count = legs.len();
        let multi = is_effective_multi(self.bet_type, leg_count);

        info!(legs = leg_count, stake = %self.stake, multi, "Submitting bet slip");
        let result = if multi {
            api.place_multi_bet(self.stake, legs).await
        } else {
            api.place_single_bets(self.stake, legs).await
        };

        match result {
            Ok(receipt) => {
                let message = receipt.message.clone().unwrap_or_else(|| {
                    if multi || leg_count == 1 {
                        "Bet placed successfully!".to_string()
                    } else {
                        format!("{} bets placed successfully!", leg_count)
                    }
                });
                self.notify(Notification::success(message));
                self.publish(SlipEvent::Submitted(receipt.clone()));

                if !keep_selections {
                    self.store.clear();
                    self.selections_changed();
                }
                Ok(receipt)
            }
            Err(err) => {
                warn!("Bet placement failed: {}", err);
                let message = err
                    .server_message()
                    .unwrap_or(GENERIC_SUBMIT_FAILURE)
                    .to_string();
                self.notify(Notification::error(message));
                Err(err)
            }
        }
    }

    fn selections_changed(&mut self) {
        self.publish(SlipEvent::SelectionsChanged {
            count: self.store.len(),
        });
        if self.bet_type == BetType::Multi && self.store.len() < 2 {
            debug!("Fewer than 2 selections, reverting to singles");
            self.switch_bet_type(BetType::Single);
        }
    }

    fn switch_bet_type(&mut self, bet_type: BetType) {
        if self.bet_type != bet_type {
            self.bet_type = bet_type;
            self.publish(SlipEvent::BetTypeChanged(bet_type));
        }
    }

    fn notify(&self, notification: Notification) {
        self.publish(SlipEvent::Notice(notification));
    }

    fn publish(&self, event: SlipEvent) {
        // No subscribers is fine; the slip is usable headless
        let _ = self.events.send(event);
    }
}
