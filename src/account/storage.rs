//! Account persistence.
//!
//! Saves and loads the demo account to/from a JSON file. The live slip is
//! never written.

use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::StorageError;

use super::ledger::Account;

/// Default state file path.
pub const DEFAULT_STATE_FILE: &str = "betslip_state.json";

/// On-disk envelope.
#[derive(Debug, Serialize, Deserialize)]
struct StoredAccount {
    account: Account,
    #[serde(with = "time::serde::rfc3339")]
    last_update: OffsetDateTime,
}

/// Save the account to a JSON file.
pub fn save_account(account: &Account, path: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = path.as_ref();
    let stored = StoredAccount {
        account: account.clone(),
        last_update: OffsetDateTime::now_utc(),
    };
    let json = serde_json::to_string_pretty(&stored).map_err(|source| StorageError::Corrupt {
        path: path.display().to_string(),
        source,
    })?;

    std::fs::write(path, json).map_err(|source| StorageError::Io {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), balance = %account.balance, "Account saved");
    Ok(())
}

/// Load the account from a JSON file.
/// Returns None if the file doesn't exist (fresh start).
pub fn load_account(path: impl AsRef<Path>) -> Result<Option<Account>, StorageError> {
    let path = path.as_ref();

    if !path.exists() {
        info!(path = %path.display(), "No saved account found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let stored: StoredAccount =
        serde_json::from_str(&json).map_err(|source| StorageError::Corrupt {
            path: path.display().to_string(),
            source,
        })?;

    info!(
        path = %path.display(),
        balance = %stored.account.balance,
        bets = stored.account.history.len(),
        last_update = %stored.last_update,
        "Account loaded from disk"
    );

    Ok(Some(stored.account))
}

/// Delete the state file (for testing or reset).
pub fn delete_account(path: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = path.as_ref();
    if path.exists() {
        std::fs::remove_file(path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
