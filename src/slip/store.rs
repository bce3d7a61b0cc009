//! Selection store: the ordered set of candidate legs

use tracing::debug;

use super::types::{Selection, SlipChange};
use crate::common::errors::SlipError;

/// Hard ceiling on concurrent selections
pub const MAX_SELECTIONS: usize = 10;

/// Ordered bet-slip selections, at most one per game
///
/// Unchanged items keep insertion order; an outcome change replaces the
/// item where it stands.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selections: Vec<Selection>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selection, toggle it off, or switch its outcome
    ///
    /// Any game id is accepted; id validation is the caller's concern.
    pub fn add_or_toggle(&mut self, selection: Selection) -> SlipChange {
        let existing = self
            .selections
            .iter()
            .position(|s| s.game_id == selection.game_id);

        match existing {
            None => {
                if self.selections.len() >= MAX_SELECTIONS {
                    debug!(game_id = %selection.game_id, "Selection limit reached");
                    return SlipChange::Rejected(SlipError::SelectionLimit {
                        max: MAX_SELECTIONS,
                    });
                }
                debug!(game_id = %selection.game_id, outcome = ?selection.outcome, "Selection added");
                self.selections.push(selection);
                SlipChange::Added
            }
            Some(index) if self.selections[index].outcome == selection.outcome => {
                debug!(game_id = %selection.game_id, "Selection toggled off");
                self.selections.remove(index);
                SlipChange::Removed
            }
            Some(index) => {
                debug!(game_id = %selection.game_id, outcome = ?selection.outcome, "Selection updated");
                self.selections[index] = selection;
                SlipChange::Updated
            }
        }
    }

    /// Remove the selection for a game; returns whether anything was removed
    pub fn remove(&mut self, game_id: &str) -> bool {
        let before = self.selections.len();
        self.selections.retain(|s| s.game_id != game_id);
        before != self.selections.len()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn get(&self, game_id: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.game_id == game_id)
    }

    pub fn contains(&self, game_id: &str) -> bool {
        self.get(game_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.selections.len() >= MAX_SELECTIONS
    }
}
