//! Bet slip module.
//!
//! This module handles:
//! - Selections (one outcome per match)
//! - The live accumulator slip and its derived totals
//! - Placement receipts

pub mod bet_slip;
pub mod selection;

pub use bet_slip::{BetSlip, ClearMode};
pub use selection::{SelectAction, Selection, SlipReceipt};
