//! Accumulator bet slip engine.
//!
//! A slip holds at most one selection per match. Its combined odds are the
//! product of the selected odds and the potential return is stake times
//! combined odds:
//!
//! ```text
//! Arsenal vs Chelsea   Home  1.65
//! PSG vs Liverpool     Away  1.90
//! ─────────────────────────────────
//! Combined odds:             3.135
//! Stake 10.00 → return:      31.35
//! ```
//!
//! # Modules
//!
//! - [`slip`]: Selections, the live slip and placement receipts
//! - [`market`]: Match board, odds and filters
//! - [`account`]: Demo balance, betting history and persistence
//! - [`session`]: Explicit per-user state tying the above together
//! - [`api`]: HTTP API for the slip, account, health and metrics
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`metrics`]: Prometheus counters
//! - [`utils`]: Utility functions

pub mod account;
pub mod api;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod session;
pub mod slip;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use session::Session;
pub use slip::{BetSlip, ClearMode, SelectAction, Selection, SlipReceipt};
