//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::account::{BetLimits, DEFAULT_STATE_FILE};
use crate::error::Result;
use crate::slip::ClearMode;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Account ===
    /// Starting balance for a fresh demo account.
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,

    /// Smallest accepted stake.
    #[serde(default = "default_min_bet")]
    pub min_bet: Decimal,

    /// Most selections one slip may hold.
    #[serde(default = "default_max_selections")]
    pub max_selections: usize,

    // === Slip Behaviour ===
    /// Reset the stake when the slip is cleared after placement.
    #[serde(default = "default_true")]
    pub reset_stake_on_clear: bool,

    // === Files ===
    /// JSON file the account is persisted to.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// JSON file with the match board.
    #[serde(default)]
    pub matches_file: Option<String>,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_initial_balance() -> Decimal {
    Decimal::new(1000, 0)
}

fn default_min_bet() -> Decimal {
    Decimal::new(10, 0)
}

fn default_max_selections() -> usize {
    20
}

fn default_true() -> bool {
    true
}

fn default_state_file() -> String {
    DEFAULT_STATE_FILE.to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            min_bet: default_min_bet(),
            max_selections: default_max_selections(),
            reset_stake_on_clear: default_true(),
            state_file: default_state_file(),
            matches_file: None,
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.min_bet <= Decimal::ZERO {
            return Err("MIN_BET must be positive".to_string());
        }

        if self.initial_balance < Decimal::ZERO {
            return Err("INITIAL_BALANCE must not be negative".to_string());
        }

        if self.max_selections == 0 {
            return Err("MAX_SELECTIONS must be at least 1".to_string());
        }

        Ok(())
    }

    /// House limits derived from the configuration.
    pub fn limits(&self) -> BetLimits {
        BetLimits {
            min_bet: self.min_bet,
            max_selections: self.max_selections,
        }
    }

    /// How the slip is cleared after a successful placement.
    pub fn clear_mode(&self) -> ClearMode {
        ClearMode::from_reset(self.reset_stake_on_clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        let config = Config::default();
        assert_eq!(config.initial_balance, Decimal::new(1000, 0));
        assert_eq!(config.min_bet, Decimal::new(10, 0));
        assert_eq!(config.state_file, "betslip_state.json");
        assert_eq!(config.clear_mode(), ClearMode::ResetStake);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_min_bet() {
        let config = Config {
            min_bet: Decimal::ZERO,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_initial_balance() {
        let config = Config {
            initial_balance: Decimal::new(-1, 0),
            ..Config::default()
        };

        assert_eq!(
            config.validate(),
            Err("INITIAL_BALANCE must not be negative".to_string())
        );

        let config = Config {
            initial_balance: Decimal::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_max_selections() {
        let config = Config {
            max_selections: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_from_env_pairs() {
        let vars = vec![
            ("MIN_BET".to_string(), "5".to_string()),
            ("RESET_STAKE_ON_CLEAR".to_string(), "false".to_string()),
            ("MATCHES_FILE".to_string(), "matches.json".to_string()),
        ];

        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.min_bet, Decimal::new(5, 0));
        assert_eq!(config.clear_mode(), ClearMode::KeepStake);
        assert_eq!(config.matches_file.as_deref(), Some("matches.json"));
        assert_eq!(config.limits().max_selections, 20);
    }
}
