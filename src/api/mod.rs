//! HTTP API module: health, metrics and the slip/account endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
