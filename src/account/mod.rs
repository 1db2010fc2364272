//! Demo account module.
//!
//! This module handles:
//! - Balance, minimum bet and balance checks on placement
//! - Betting history with pending/won/lost settlement
//! - JSON persistence of the account

pub mod ledger;
pub mod storage;

pub use ledger::{Account, BetLimits, BetStatus, BettingStats, PlacedBet};
pub use storage::{delete_account, load_account, save_account, DEFAULT_STATE_FILE};
