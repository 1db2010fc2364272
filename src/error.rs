//! Unified error types for the bet slip service.

use rust_decimal::Decimal;
use thiserror::Error;

/// Unified error type for the bet slip service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Match board error.
    #[error("market error: {0}")]
    Market(#[from] MarketError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a slip cannot be turned into a bet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlipError {
    /// No selections on the slip.
    #[error("add a selection before placing a bet")]
    EmptySlip,

    /// Stake is zero or negative.
    #[error("enter a valid stake amount (got {stake})")]
    InvalidStake {
        /// The rejected stake.
        stake: Decimal,
    },
}

impl SlipError {
    /// Stable machine-readable code for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            SlipError::EmptySlip => "EMPTY_SLIP",
            SlipError::InvalidStake { .. } => "INVALID_STAKE",
        }
    }
}

/// Demo account ledger errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// The slip itself is not placeable.
    #[error(transparent)]
    Slip(#[from] SlipError),

    /// Stake is below the house minimum.
    #[error("stake {stake} is below the minimum bet of {min_bet}")]
    BelowMinimum {
        /// Stake on the slip.
        stake: Decimal,
        /// Configured minimum.
        min_bet: Decimal,
    },

    /// Account balance too low.
    #[error("insufficient balance: need {required}, have {available}")]
    InsufficientBalance {
        /// Required balance.
        required: Decimal,
        /// Available balance.
        available: Decimal,
    },

    /// No bet with this id in the history.
    #[error("unknown bet {bet_id}")]
    UnknownBet {
        /// The bet id that was looked up.
        bet_id: String,
    },

    /// Bet has already been settled.
    #[error("bet {bet_id} is already settled")]
    AlreadySettled {
        /// The settled bet id.
        bet_id: String,
    },
}

impl AccountError {
    /// Stable machine-readable code for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::Slip(e) => e.code(),
            AccountError::BelowMinimum { .. } => "BELOW_MINIMUM",
            AccountError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            AccountError::UnknownBet { .. } => "UNKNOWN_BET",
            AccountError::AlreadySettled { .. } => "ALREADY_SETTLED",
        }
    }
}

/// Match board and selection sourcing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// Match id not on the board.
    #[error("match {match_id} not found")]
    UnknownMatch {
        /// The match id that was looked up.
        match_id: String,
    },

    /// Odd is below 1.0.
    #[error("invalid odd {0}: must be at least 1.0")]
    InvalidOdd(Decimal),

    /// Match id is empty.
    #[error("match id must not be empty")]
    EmptyMatchId,

    /// Slip already holds the maximum number of selections.
    #[error("slip is full: at most {max} selections")]
    TooManySelections {
        /// Configured maximum.
        max: usize,
    },

    /// Failed to parse board data.
    #[error("failed to parse match data: {0}")]
    ParseError(String),
}

impl MarketError {
    /// Stable machine-readable code for presentation layers.
    pub fn code(&self) -> &'static str {
        match self {
            MarketError::UnknownMatch { .. } => "UNKNOWN_MATCH",
            MarketError::InvalidOdd(_) => "INVALID_ODD",
            MarketError::EmptyMatchId => "EMPTY_MATCH_ID",
            MarketError::TooManySelections { .. } => "TOO_MANY_SELECTIONS",
            MarketError::ParseError(_) => "PARSE_ERROR",
        }
    }
}

/// Account persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read or write the state file.
    #[error("failed to access state file {path}: {source}")]
    Io {
        /// State file path.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// State file contents are not valid.
    #[error("failed to parse state file {path}: {source}")]
    Corrupt {
        /// State file path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
