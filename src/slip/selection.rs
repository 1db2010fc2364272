//! Slip selections and placement receipts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One chosen outcome for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Match identifier, unique within a slip.
    pub match_id: String,
    /// Outcome description (team or outcome name).
    pub label: String,
    /// Decimal odd, at least 1.0.
    pub odd: Decimal,
}

impl Selection {
    /// Create a new selection.
    pub fn new(match_id: impl Into<String>, label: impl Into<String>, odd: Decimal) -> Self {
        Self {
            match_id: match_id.into(),
            label: label.into(),
            odd,
        }
    }
}

/// What `select_outcome` did to the slip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SelectAction {
    /// New match appended.
    Added,
    /// Different outcome swapped in at the same position.
    Replaced,
    /// Same outcome picked again, selection dropped.
    Removed,
}

/// Snapshot of a slip taken at placement time.
///
/// Owns its selections, so later edits to the live slip never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipReceipt {
    /// Selections at the moment of placement.
    pub selections: Vec<Selection>,
    /// Stake.
    pub stake: Decimal,
    /// Product of selection odds.
    pub combined_odds: Decimal,
    /// stake * combined_odds.
    pub potential_return: Decimal,
}

impl SlipReceipt {
    /// Profit if every selection wins.
    pub fn potential_profit(&self) -> Decimal {
        self.potential_return - self.stake
    }

    /// Short human-readable description, e.g. "match_1: Home @ 1.65".
    pub fn describe(&self) -> String {
        self.selections
            .iter()
            .map(|s| format!("{}: {} @ {}", s.match_id, s.label, s.odd))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn receipt_profit() {
        let receipt = SlipReceipt {
            selections: vec![Selection::new("a", "Home", dec!(1.65))],
            stake: dec!(10),
            combined_odds: dec!(1.65),
            potential_return: dec!(16.5),
        };

        assert_eq!(receipt.potential_profit(), dec!(6.5));
        assert_eq!(receipt.describe(), "a: Home @ 1.65");
    }

    #[test]
    fn select_action_display() {
        assert_eq!(SelectAction::Replaced.to_string(), "replaced");
        assert_eq!(SelectAction::Added.as_ref(), "added");
    }
}
