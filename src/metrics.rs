//! Prometheus metrics for slip activity.
//!
//! This module provides metrics for:
//! - Slip selection changes
//! - Bet placements and rejections
//! - Settlements

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::slip::SelectAction;

// === Metric Name Constants ===

/// Slip selection changes counter metric name.
pub const METRIC_SLIP_SELECTIONS: &str = "slip_selections_total";
/// Bets placed counter metric name.
pub const METRIC_BETS_PLACED: &str = "bets_placed_total";
/// Bets rejected counter metric name.
pub const METRIC_BETS_REJECTED: &str = "bets_rejected_total";
/// Bets settled counter metric name.
pub const METRIC_BETS_SETTLED: &str = "bets_settled_total";
/// Stake size histogram metric name.
pub const METRIC_BET_STAKE: &str = "bet_stake";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_SLIP_SELECTIONS,
        "Slip selection changes by action (added, replaced, removed)"
    );
    describe_counter!(METRIC_BETS_PLACED, "Total number of bets placed");
    describe_counter!(
        METRIC_BETS_REJECTED,
        "Total number of placements rejected, by reason"
    );
    describe_counter!(METRIC_BETS_SETTLED, "Total number of bets settled, by result");
    describe_histogram!(METRIC_BET_STAKE, "Stake of placed bets");

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder and return a handle for rendering.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Count a slip selection change.
pub fn inc_slip_selection(action: SelectAction) {
    counter!(METRIC_SLIP_SELECTIONS, "action" => action.as_ref().to_string()).increment(1);
}

/// Count a placed bet and record its stake.
pub fn record_bet_placed(stake: Decimal) {
    counter!(METRIC_BETS_PLACED).increment(1);
    histogram!(METRIC_BET_STAKE).record(stake.to_f64().unwrap_or_default());
}

/// Count a rejected placement.
pub fn inc_bets_rejected(reason: &'static str) {
    counter!(METRIC_BETS_REJECTED, "reason" => reason).increment(1);
}

/// Count a settlement.
pub fn inc_bets_settled(won: bool) {
    let result = if won { "won" } else { "lost" };
    counter!(METRIC_BETS_SETTLED, "result" => result).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn recording_without_recorder_is_noop() {
        inc_slip_selection(SelectAction::Added);
        record_bet_placed(dec!(10));
        inc_bets_rejected("EMPTY_SLIP");
        inc_bets_settled(true);
    }
}
