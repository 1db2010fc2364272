//! Demo account: balance, betting history and stats.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AccountError;
use crate::slip::{BetSlip, SlipReceipt};

/// Settlement state of a placed bet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BetStatus {
    /// Awaiting result.
    #[default]
    Pending,
    /// Every selection won.
    Won,
    /// At least one selection lost.
    Lost,
}

/// House limits applied on top of slip validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetLimits {
    /// Smallest accepted stake.
    pub min_bet: Decimal,
    /// Most selections one slip may hold.
    pub max_selections: usize,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_bet: Decimal::TEN,
            max_selections: 20,
        }
    }
}

/// A bet recorded in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedBet {
    /// Bet identifier (e.g. "bet_6f1c...").
    pub id: String,
    /// Slip snapshot at placement.
    pub receipt: SlipReceipt,
    /// Settlement state.
    pub status: BetStatus,
    /// Placement time.
    #[serde(with = "time::serde::rfc3339")]
    pub placed_at: OffsetDateTime,
    /// Settlement time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub settled_at: Option<OffsetDateTime>,
}

impl PlacedBet {
    /// Signed result once settled: return minus stake when won, minus stake when lost.
    pub fn net_result(&self) -> Option<Decimal> {
        match self.status {
            BetStatus::Pending => None,
            BetStatus::Won => Some(self.receipt.potential_profit()),
            BetStatus::Lost => Some(-self.receipt.stake),
        }
    }
}

/// Running betting statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingStats {
    /// Bets placed.
    pub total_bets: u64,
    /// Bets won.
    pub won_bets: u64,
    /// Net profit over settled bets.
    pub total_profit: Decimal,
}

impl BettingStats {
    /// Won bets as a percentage of all bets (0 when none placed).
    pub fn win_rate(&self) -> Decimal {
        if self.total_bets == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(self.won_bets) * Decimal::ONE_HUNDRED / Decimal::from(self.total_bets)
        }
    }
}

/// Demo betting account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Available balance.
    pub balance: Decimal,
    /// Placed bets, newest first.
    pub history: Vec<PlacedBet>,
    /// Running stats.
    pub stats: BettingStats,
}

impl Account {
    /// Open an account with a starting balance.
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            balance: initial_balance,
            history: Vec::new(),
            stats: BettingStats::default(),
        }
    }

    /// Place the slip as a bet.
    ///
    /// Deducts the stake and records a pending bet. The slip is not touched.
    pub fn place(&mut self, slip: &BetSlip, limits: &BetLimits) -> Result<&PlacedBet, AccountError> {
        let receipt = slip.place_bet()?;

        if receipt.stake < limits.min_bet {
            return Err(AccountError::BelowMinimum {
                stake: receipt.stake,
                min_bet: limits.min_bet,
            });
        }
        if receipt.stake > self.balance {
            return Err(AccountError::InsufficientBalance {
                required: receipt.stake,
                available: self.balance,
            });
        }

        self.balance -= receipt.stake;
        self.stats.total_bets += 1;

        let bet = PlacedBet {
            id: format!("bet_{}", Uuid::new_v4().simple()),
            receipt,
            status: BetStatus::Pending,
            placed_at: OffsetDateTime::now_utc(),
            settled_at: None,
        };
        info!(
            bet_id = %bet.id,
            stake = %bet.receipt.stake,
            combined_odds = %bet.receipt.combined_odds,
            potential_return = %bet.receipt.potential_return,
            balance = %self.balance,
            "Bet placed"
        );

        self.history.insert(0, bet);
        Ok(&self.history[0])
    }

    /// Settle a pending bet as won or lost.
    pub fn settle(&mut self, bet_id: &str, won: bool) -> Result<&PlacedBet, AccountError> {
        let idx = self
            .history
            .iter()
            .position(|b| b.id == bet_id)
            .ok_or_else(|| AccountError::UnknownBet {
                bet_id: bet_id.to_string(),
            })?;

        let bet = &mut self.history[idx];
        if bet.status != BetStatus::Pending {
            warn!(bet_id, status = %bet.status, "Settlement of a settled bet refused");
            return Err(AccountError::AlreadySettled {
                bet_id: bet_id.to_string(),
            });
        }

        bet.settled_at = Some(OffsetDateTime::now_utc());
        if won {
            bet.status = BetStatus::Won;
            self.balance = self.balance.saturating_add(bet.receipt.potential_return);
            self.stats.won_bets += 1;
            self.stats.total_profit = self
                .stats
                .total_profit
                .saturating_add(bet.receipt.potential_profit());
        } else {
            bet.status = BetStatus::Lost;
            self.stats.total_profit -= bet.receipt.stake;
        }

        info!(bet_id, status = %bet.status, balance = %self.balance, "Bet settled");
        Ok(&self.history[idx])
    }

    /// Look up a bet by id.
    pub fn bet(&self, bet_id: &str) -> Option<&PlacedBet> {
        self.history.iter().find(|b| b.id == bet_id)
    }

    /// History, newest first, optionally restricted to one status.
    pub fn history(&self, status: Option<BetStatus>) -> Vec<&PlacedBet> {
        self.history
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .collect()
    }

    /// Stakes tied up in pending bets.
    pub fn pending_exposure(&self) -> Decimal {
        self.history
            .iter()
            .filter(|b| b.status == BetStatus::Pending)
            .map(|b| b.receipt.stake)
            .sum()
    }
}
