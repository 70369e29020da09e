//! Error types shared across the bridge.
//!
//! Only two of these ever reach the HTTP boundary: [`SignatureError`] (400)
//! and [`StoreError`] (500). Reply failures are logged and absorbed.

use thiserror::Error;

/// Configuration could not be loaded; the process must not start serving.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("CHANNEL_SECRET is not set")]
    MissingSecret,

    #[error("REPLY_ENABLED is set but CHANNEL_ACCESS_TOKEN is missing")]
    MissingAccessToken,
}

/// The request body could not be authenticated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header is missing")]
    Missing,

    #[error("signature header is malformed")]
    Malformed,

    #[error("signature does not match body")]
    Mismatch,
}

/// A verified body was not a LINE webhook envelope.
#[derive(Debug, Error)]
#[error("invalid webhook body: {0}")]
pub struct ParseError(#[from] pub serde_json::Error);

/// The OTP slot could not be read or written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("otp slot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("otp slot holds an invalid value")]
    Corrupt,

    #[error("otp slot task failed: {0}")]
    Task(String),
}

/// An outbound reply could not be delivered.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reply rejected with status {status}: {body}")]
    Status { status: u16, body: String },
}
