//! Market module for the betting board.
//!
//! This module handles:
//! - Match and outcome types
//! - Board filtering (sport, league, status, odd band, team search)
//! - The in-memory match board

pub mod board;
pub mod filter;
pub mod types;

pub use board::MatchBoard;
pub use filter::{FilterParams, MatchFilter, OddBand};
pub use types::{validate_match_id, validate_odd, Match, MatchOdds, MatchStatus, Pick, Sport};
