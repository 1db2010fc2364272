//! HTTP API handlers.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::error;

use crate::account::{save_account, Account, BetStatus, PlacedBet};
use crate::error::{AccountError, MarketError};
use crate::market::filter::is_unset;
use crate::market::{FilterParams, Match, MatchFilter, Pick};
use crate::session::Session;
use crate::slip::{BetSlip, ClearMode, SelectAction, Selection};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether the service is ready.
    pub ready: Arc<AtomicBool>,
    /// The single betting session served.
    pub session: Arc<RwLock<Session>>,
    /// Where the account is saved after changes.
    pub state_file: Option<PathBuf>,
    /// Prometheus renderer, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
    /// Orders writes of the state file.
    save_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create new app state around a session.
    pub fn new(session: Session) -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            session: Arc::new(RwLock::new(session)),
            state_file: None,
            metrics: None,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Save the account after every change.
    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = Some(path.into());
        self
    }

    /// Serve `/metrics` from this handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Write a snapshot of the account to the state file, if one is set.
    ///
    /// Must be called while the session guard that produced `account` is
    /// still held, so snapshots reach the disk in mutation order.
    async fn persist(&self, account: &Account) -> Option<Persist> {
        let path = self.state_file.clone()?;
        let order = self.save_lock.clone().lock_owned().await;
        Some(Persist {
            account: account.clone(),
            path,
            _order: order,
        })
    }
}

/// Pending state file write, ordered by the save lock it holds.
struct Persist {
    account: Account,
    path: PathBuf,
    _order: tokio::sync::OwnedMutexGuard<()>,
}

impl Persist {
    /// Save off the async runtime. Failures are logged, never surfaced.
    async fn write(self) {
        let Persist {
            account,
            path,
            _order,
        } = self;
        let result = tokio::task::spawn_blocking(move || save_account(&account, &path)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Failed to save account"),
            Err(e) => error!(error = %e, "Account save task failed"),
        }
    }
}

// === Errors ===

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable error code (e.g. "EMPTY_SLIP").
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// Handler error carrying its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                code,
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<MarketError> for ApiError {
    fn from(e: MarketError) -> Self {
        let status = match e {
            MarketError::UnknownMatch { .. } => StatusCode::NOT_FOUND,
            MarketError::ParseError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            body: ErrorResponse {
                code: e.code(),
                message: e.to_string(),
            },
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        let status = match e {
            AccountError::UnknownBet { .. } => StatusCode::NOT_FOUND,
            AccountError::AlreadySettled { .. } => StatusCode::CONFLICT,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            body: ErrorResponse {
                code: e.code(),
                message: e.to_string(),
            },
        }
    }
}

// === Responses ===

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether service is ready.
    pub ready: bool,
    /// Matches on the board.
    pub matches: usize,
}

/// Current slip as rendered after every mutation.
#[derive(Debug, Serialize, Deserialize)]
pub struct SlipResponse {
    /// Selections in display order.
    pub selections: Vec<Selection>,
    /// Stake.
    pub stake: Decimal,
    /// Product of selection odds.
    pub combined_odds: Decimal,
    /// stake * combined_odds.
    pub potential_return: Decimal,
    /// What the last selection call did, if this answers one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<SelectAction>,
}

impl SlipResponse {
    fn from_slip(slip: &BetSlip, action: Option<SelectAction>) -> Self {
        Self {
            selections: slip.selections().to_vec(),
            stake: slip.stake(),
            combined_odds: slip.combined_odds(),
            potential_return: slip.potential_return(),
            action,
        }
    }
}

/// Account summary.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Available balance.
    pub balance: Decimal,
    /// Bets placed.
    pub total_bets: u64,
    /// Bets won.
    pub won_bets: u64,
    /// Win rate in percent.
    pub win_rate: Decimal,
    /// Net profit.
    pub total_profit: Decimal,
    /// Stakes in pending bets.
    pub pending_exposure: Decimal,
}

// === Requests ===

/// Add or toggle a selection, either by board pick or by explicit odd.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// Match identifier.
    pub match_id: String,
    /// 1X2 pick from the board.
    #[serde(default)]
    pub pick: Option<Pick>,
    /// Outcome label, used with `odd` when no pick is given.
    #[serde(default)]
    pub label: Option<String>,
    /// Decimal odd for `label`.
    #[serde(default)]
    pub odd: Option<Decimal>,
}

/// Stake input, text or number.
#[derive(Debug, Deserialize)]
pub struct StakeRequest {
    /// Raw stake value.
    #[serde(default)]
    pub stake: serde_json::Value,
}

/// Clear options.
#[derive(Debug, Default, Deserialize)]
pub struct ClearRequest {
    /// Reset the stake too. Defaults to the configured behaviour.
    #[serde(default)]
    pub reset_stake: Option<bool>,
}

/// History filter.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// "pending", "won", "lost" or "all".
    #[serde(default)]
    pub status: Option<String>,
}

/// Settlement input.
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    /// Whether the bet won.
    pub won: bool,
}

// === Handlers ===

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let matches = state.session.read().await.board.len();

    let response = ReadyResponse {
        ready: is_ready,
        matches,
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Current slip.
pub async fn get_slip(State(state): State<AppState>) -> Json<SlipResponse> {
    let session = state.session.read().await;
    Json(SlipResponse::from_slip(&session.slip, None))
}

/// Add, replace or toggle off a selection.
pub async fn select(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SlipResponse>, ApiError> {
    let mut session = state.session.write().await;

    let action = match (req.pick, req.label, req.odd) {
        (Some(pick), _, _) => session.select_pick(&req.match_id, pick)?,
        (None, Some(label), Some(odd)) => session.select(req.match_id, label, odd)?,
        _ => {
            return Err(ApiError::bad_request(
                "MISSING_OUTCOME",
                "provide either a pick or a label and odd",
            ))
        }
    };

    Ok(Json(SlipResponse::from_slip(&session.slip, Some(action))))
}

/// Remove a selection. Missing selections are not an error.
pub async fn remove_selection(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Json<SlipResponse> {
    let mut session = state.session.write().await;
    session.remove(&match_id);
    Json(SlipResponse::from_slip(&session.slip, None))
}

/// Set the stake from forgiving input.
pub async fn set_stake(
    State(state): State<AppState>,
    Json(req): Json<StakeRequest>,
) -> Json<SlipResponse> {
    let raw = match req.stake {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    };

    let mut session = state.session.write().await;
    session.slip.set_stake_input(&raw);
    Json(SlipResponse::from_slip(&session.slip, None))
}

/// Clear the slip.
pub async fn clear_slip(
    State(state): State<AppState>,
    body: Option<Json<ClearRequest>>,
) -> Json<SlipResponse> {
    let req = body.map(|Json(r)| r).unwrap_or_default();

    let mut session = state.session.write().await;
    let mode = req
        .reset_stake
        .map(ClearMode::from_reset)
        .unwrap_or(session.clear_after_place);
    session.slip.clear(mode);
    Json(SlipResponse::from_slip(&session.slip, None))
}

/// Place the slip as a bet.
pub async fn place_bet(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<PlacedBet>), ApiError> {
    let (bet, pending) = {
        let mut session = state.session.write().await;
        let bet = session.place()?;
        (bet, state.persist(&session.account).await)
    };
    if let Some(save) = pending {
        save.write().await;
    }
    Ok((StatusCode::CREATED, Json(bet)))
}

/// Matches on the board, filtered.
pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let filter = MatchFilter::try_from(params)?;
    let session = state.session.read().await;
    let matches = session.board.filter(&filter).into_iter().cloned().collect();
    Ok(Json(matches))
}

/// Account summary.
pub async fn get_account(State(state): State<AppState>) -> Json<AccountResponse> {
    let session = state.session.read().await;
    let account = &session.account;
    Json(AccountResponse {
        balance: account.balance,
        total_bets: account.stats.total_bets,
        won_bets: account.stats.won_bets,
        win_rate: account.stats.win_rate(),
        total_profit: account.stats.total_profit,
        pending_exposure: account.pending_exposure(),
    })
}

/// Betting history, newest first.
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<PlacedBet>>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !is_unset(s)) {
        None => None,
        Some(s) => Some(s.trim().parse::<BetStatus>().map_err(|_| {
            ApiError::bad_request("INVALID_STATUS", format!("unknown bet status '{s}'"))
        })?),
    };

    let session = state.session.read().await;
    Ok(Json(
        session.account.history(status).into_iter().cloned().collect(),
    ))
}

/// Settle a pending bet.
pub async fn settle_bet(
    State(state): State<AppState>,
    Path(bet_id): Path<String>,
    Json(req): Json<SettleRequest>,
) -> Result<Json<PlacedBet>, ApiError> {
    let (bet, pending) = {
        let mut session = state.session.write().await;
        let bet = session.settle(&bet_id, req.won)?;
        (bet, state.persist(&session.account).await)
    };
    if let Some(save) = pending {
        save.write().await;
    }
    Ok(Json(bet))
}

/// One bet from the history.
pub async fn get_bet(
    State(state): State<AppState>,
    Path(bet_id): Path<String>,
) -> Result<Json<PlacedBet>, ApiError> {
    let session = state.session.read().await;
    match session.account.bet(&bet_id) {
        Some(bet) => Ok(Json(bet.clone())),
        None => Err(AccountError::UnknownBet { bet_id }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::BetLimits;
    use crate::market::MatchBoard;
    use rust_decimal_macros::dec;

    #[test]
    fn app_state_ready_toggle() {
        let state = AppState::new(Session::new(
            Account::new(dec!(100)),
            MatchBoard::default(),
            BetLimits::default(),
        ));
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[test]
    fn error_status_mapping() {
        let e = ApiError::from(AccountError::UnknownBet {
            bet_id: "x".to_string(),
        });
        assert_eq!(e.status, StatusCode::NOT_FOUND);

        let e = ApiError::from(AccountError::Slip(crate::error::SlipError::EmptySlip));
        assert_eq!(e.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(e.body.code, "EMPTY_SLIP");

        let e = ApiError::from(MarketError::UnknownMatch {
            match_id: "m".to_string(),
        });
        assert_eq!(e.status, StatusCode::NOT_FOUND);
    }
}
