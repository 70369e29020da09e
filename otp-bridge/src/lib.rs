//! OTP Bridge - captures one-time passwords sent over LINE.
//!
//! A user forwards an OTP to the bot; the bridge verifies the webhook,
//! pulls the first standalone 6-digit code out of the message and writes it
//! to a shared file where a local automation process picks it up.
//!
//! ## Architecture
//!
//! ```text
//! LINE → POST /callback → signature check → events → MessageHandler → otp.txt
//!                                                          └──→ reply (optional)
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod line;
pub mod otp;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, ParseError, ReplyError, SignatureError, StoreError};
pub use handler::MessageHandler;
pub use line::{LineReplyClient, MessageEvent, ReplySender, WebhookEnvelope, WebhookEvent};
pub use otp::{extract_otp, FileOtpStore, MemoryOtpStore, OtpCode, OtpStore};
pub use web::{router, AppState};
