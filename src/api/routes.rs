//! HTTP API route definitions.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    clear_slip, get_account, get_bet, get_slip, health, history, list_matches, metrics, place_bet, ready,
    remove_selection, select, set_stake, settle_bet, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics))
        // Slip
        .route("/api/v1/slip", get(get_slip))
        .route("/api/v1/slip/selections", post(select))
        .route("/api/v1/slip/selections/:match_id", delete(remove_selection))
        .route("/api/v1/slip/stake", put(set_stake))
        .route("/api/v1/slip/clear", post(clear_slip))
        .route("/api/v1/slip/place", post(place_bet))
        // Board and account
        .route("/api/v1/matches", get(list_matches))
        .route("/api/v1/account", get(get_account))
        .route("/api/v1/history", get(history))
        .route("/api/v1/bets/:bet_id", get(get_bet))
        .route("/api/v1/bets/:bet_id/settle", post(settle_bet))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
