//! Webhook endpoint handlers.
//!
//! The callback handler:
//! 1. Verifies the signature over the raw body
//! 2. Parses the event envelope
//! 3. Runs every text message through the [`MessageHandler`]
//! 4. Returns `OK` once all events are processed

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::SignatureError;
use crate::handler::MessageHandler;
use crate::line::{WebhookEnvelope, WebhookEvent};
use crate::web::signature::{verify_signature, SIGNATURE_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub handler: MessageHandler,
}

impl AppState {
    pub fn new(config: Config, handler: MessageHandler) -> Self {
        Self {
            config: Arc::new(config),
            handler,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// LINE Callback
// =============================================================================

const OK: (StatusCode, &str) = (StatusCode::OK, "OK");
const BAD_REQUEST: (StatusCode, &str) = (StatusCode::BAD_REQUEST, "Bad Request");
const SERVER_ERROR: (StatusCode, &str) = (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");

/// LINE webhook endpoint.
///
/// Takes the body as raw bytes: the signature covers the exact bytes on the
/// wire, not a re-serialized form.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    info!(body_length = body.len(), "callback_received");
    debug!(body = %String::from_utf8_lossy(&body), "callback_body");

    let verified = signature_header(&headers)
        .and_then(|signature| verify_signature(&state.config.channel_secret, &body, signature));
    if let Err(e) = verified {
        warn!(error = %e, "callback_signature_rejected");
        return BAD_REQUEST;
    }

    let envelope = match WebhookEnvelope::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "callback_body_invalid");
            return BAD_REQUEST;
        }
    };

    info!(
        destination = ?envelope.destination,
        event_count = envelope.events.len(),
        "callback_verified"
    );

    for (index, event) in envelope.events.iter().enumerate() {
        match event {
            WebhookEvent::TextMessage(message) => {
                if let Err(e) = state.handler.handle_text(message).await {
                    error!(event_index = index, error = %e, "otp_store_failed");
                    return SERVER_ERROR;
                }
            }
            WebhookEvent::Other => {
                debug!(event_index = index, "callback_event_ignored");
            }
        }
    }

    OK
}

/// Read the signature header; a value that is not visible ASCII is malformed.
fn signature_header(headers: &HeaderMap) -> Result<Option<&str>, SignatureError> {
    headers
        .get(SIGNATURE_HEADER)
        .map(|v| v.to_str().map_err(|_| SignatureError::Malformed))
        .transpose()
}
