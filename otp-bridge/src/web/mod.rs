//! Web server module for the LINE webhook.
//!
//! Routes:
//! - `POST /callback`: signed LINE webhook deliveries
//! - `GET /health`: liveness probe

pub mod handlers;
pub mod signature;

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use handlers::{callback, health, AppState, HealthResponse};
pub use signature::{verify_signature, SIGNATURE_HEADER};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::new()
        .route("/health", get(health))
        .route("/callback", post(callback))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}
