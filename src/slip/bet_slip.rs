//! Live accumulator slip.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::SlipError;

use super::selection::{SelectAction, Selection, SlipReceipt};

/// Whether `clear` also resets the stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// Keep whatever stake was entered.
    KeepStake,
    /// Reset the stake to zero.
    ResetStake,
}

impl ClearMode {
    /// Map a boolean "reset stake" flag to a mode.
    pub fn from_reset(reset_stake: bool) -> Self {
        if reset_stake {
            ClearMode::ResetStake
        } else {
            ClearMode::KeepStake
        }
    }
}

/// In-progress multi-selection wager.
///
/// Holds at most one selection per match. `combined_odds` and
/// `potential_return` are recomputed after every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct BetSlip {
    selections: Vec<Selection>,
    stake: Decimal,
    combined_odds: Decimal,
    potential_return: Decimal,
}

impl Default for BetSlip {
    fn default() -> Self {
        Self::new()
    }
}

impl BetSlip {
    /// Create an empty slip with zero stake.
    pub fn new() -> Self {
        Self {
            selections: Vec::new(),
            stake: Decimal::ZERO,
            combined_odds: Decimal::ONE,
            potential_return: Decimal::ZERO,
        }
    }

    /// Selections in display order.
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Current stake.
    pub fn stake(&self) -> Decimal {
        self.stake
    }

    /// Product of all selection odds (1 for an empty slip).
    pub fn combined_odds(&self) -> Decimal {
        self.combined_odds
    }

    /// stake * combined_odds.
    pub fn potential_return(&self) -> Decimal {
        self.potential_return
    }

    /// Number of selections.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Whether the slip has no selections.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Selection held for a match, if any.
    pub fn selection(&self, match_id: &str) -> Option<&Selection> {
        self.selections.iter().find(|s| s.match_id == match_id)
    }

    /// Pick an outcome for a match.
    ///
    /// Appends when the match is new, swaps in place when a different
    /// outcome is already held, and removes the selection when the exact
    /// same outcome is picked again.
    pub fn select_outcome(
        &mut self,
        match_id: impl Into<String>,
        label: impl Into<String>,
        odd: Decimal,
    ) -> SelectAction {
        let incoming = Selection::new(match_id, label, odd);

        let action = match self
            .selections
            .iter()
            .position(|s| s.match_id == incoming.match_id)
        {
            None => {
                self.selections.push(incoming);
                SelectAction::Added
            }
            Some(idx) if self.selections[idx] == incoming => {
                self.selections.remove(idx);
                SelectAction::Removed
            }
            Some(idx) => {
                // Same label at a moved price refreshes the odd rather than toggling off.
                self.selections[idx] = incoming;
                SelectAction::Replaced
            }
        };

        self.recompute();
        debug!(
            action = %action,
            selections = self.selections.len(),
            combined_odds = %self.combined_odds,
            "Slip selection updated"
        );
        action
    }

    /// Drop the selection for a match. Returns whether one was removed.
    pub fn remove_selection(&mut self, match_id: &str) -> bool {
        let before = self.selections.len();
        self.selections.retain(|s| s.match_id != match_id);
        let removed = self.selections.len() != before;
        self.recompute();
        if removed {
            debug!(match_id, "Selection removed from slip");
        }
        removed
    }

    /// Set the stake. Negative amounts become zero.
    pub fn set_stake(&mut self, amount: Decimal) {
        self.stake = if amount.is_sign_negative() {
            Decimal::ZERO
        } else {
            amount
        };
        self.recompute();
    }

    /// Set the stake from raw user input. Anything unparseable becomes zero.
    pub fn set_stake_input(&mut self, input: &str) {
        let amount = parse_stake(input).unwrap_or(Decimal::ZERO);
        self.set_stake(amount);
    }

    /// Remove every selection.
    pub fn clear(&mut self, mode: ClearMode) {
        self.selections.clear();
        if mode == ClearMode::ResetStake {
            self.stake = Decimal::ZERO;
        }
        self.recompute();
        debug!(?mode, "Slip cleared");
    }

    /// Snapshot the slip for placement.
    ///
    /// An empty slip is reported before a bad stake. The slip is left as is.
    pub fn place_bet(&self) -> Result<SlipReceipt, SlipError> {
        if self.selections.is_empty() {
            return Err(SlipError::EmptySlip);
        }
        if self.stake <= Decimal::ZERO {
            return Err(SlipError::InvalidStake { stake: self.stake });
        }

        Ok(SlipReceipt {
            selections: self.selections.clone(),
            stake: self.stake,
            combined_odds: self.combined_odds,
            potential_return: self.potential_return,
        })
    }

    fn recompute(&mut self) {
        self.combined_odds = self
            .selections
            .iter()
            .try_fold(Decimal::ONE, |acc, s| acc.checked_mul(s.odd))
            .unwrap_or(Decimal::MAX)
            .normalize();
        self.potential_return = self
            .stake
            .checked_mul(self.combined_odds)
            .unwrap_or(Decimal::MAX)
            .normalize();
    }
}

fn parse_stake(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_str(&trimmed.replace(',', ".")))
        .ok()
}
