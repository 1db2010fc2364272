//! One user's betting session: live slip, account and board.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::account::{Account, BetLimits, PlacedBet};
use crate::error::{AccountError, MarketError};
use crate::market::{validate_match_id, validate_odd, MatchBoard, Pick};
use crate::metrics;
use crate::slip::{BetSlip, ClearMode, SelectAction};

/// Explicit state owned by a presentation layer.
#[derive(Debug, Clone)]
pub struct Session {
    /// Live slip.
    pub slip: BetSlip,
    /// Demo account.
    pub account: Account,
    /// Matches on offer.
    pub board: MatchBoard,
    /// House limits.
    pub limits: BetLimits,
    /// How the slip is cleared after a placement.
    pub clear_after_place: ClearMode,
}

impl Session {
    /// Start a session with an empty slip.
    pub fn new(account: Account, board: MatchBoard, limits: BetLimits) -> Self {
        Self {
            slip: BetSlip::new(),
            account,
            board,
            limits,
            clear_after_place: ClearMode::ResetStake,
        }
    }

    /// Set how the slip is cleared after a placement.
    pub fn with_clear_mode(mut self, mode: ClearMode) -> Self {
        self.clear_after_place = mode;
        self
    }

    /// Pick an outcome of a listed match.
    pub fn select_pick(&mut self, match_id: &str, pick: Pick) -> Result<SelectAction, MarketError> {
        let (id, label, odd) = self.board.get(match_id)?.selection_for(pick)?;
        self.select(id, label, odd)
    }

    /// Pick an arbitrary outcome, validating the input first.
    pub fn select(
        &mut self,
        match_id: String,
        label: String,
        odd: Decimal,
    ) -> Result<SelectAction, MarketError> {
        validate_match_id(&match_id)?;
        let odd = validate_odd(odd)?;

        if self.slip.selection(&match_id).is_none() && self.slip.len() >= self.limits.max_selections {
            warn!(match_id, max = self.limits.max_selections, "Slip is full");
            return Err(MarketError::TooManySelections {
                max: self.limits.max_selections,
            });
        }

        let action = self.slip.select_outcome(match_id, label, odd);
        metrics::inc_slip_selection(action);
        Ok(action)
    }

    /// Drop a selection from the slip.
    pub fn remove(&mut self, match_id: &str) -> bool {
        let removed = self.slip.remove_selection(match_id);
        if removed {
            metrics::inc_slip_selection(SelectAction::Removed);
        }
        removed
    }

    /// Place the slip against the account and clear it on success.
    pub fn place(&mut self) -> Result<PlacedBet, AccountError> {
        let bet = match self.account.place(&self.slip, &self.limits) {
            Ok(bet) => bet.clone(),
            Err(e) => {
                warn!(code = e.code(), error = %e, "Bet rejected");
                metrics::inc_bets_rejected(e.code());
                return Err(e);
            }
        };

        metrics::record_bet_placed(bet.receipt.stake);
        self.slip.clear(self.clear_after_place);
        Ok(bet)
    }

    /// Settle a pending bet.
    pub fn settle(&mut self, bet_id: &str, won: bool) -> Result<PlacedBet, AccountError> {
        let bet = self.account.settle(bet_id, won)?.clone();
        metrics::inc_bets_settled(won);
        info!(bet_id, won, balance = %self.account.balance, "Settlement applied");
        Ok(bet)
    }
}
