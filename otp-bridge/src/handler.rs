//! Text message handling: extract, persist, then optionally reply.
//!
//! Persistence always happens before the reply. A failed reply never undoes
//! a stored code, and a failed store skips the reply entirely.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::line::{MessageEvent, ReplySender};
use crate::otp::{extract_otp, OtpCode, OtpStore};

/// Reply sent when no code was found.
pub const NO_MATCH_REPLY: &str = "That does not look like a 6-digit code. Please try again.";

/// Reply sent after a code was stored.
pub fn stored_reply(code: &OtpCode) -> String {
    format!("Thank you! OTP {} received.", code)
}

/// Handles text message events for one deployment.
#[derive(Clone)]
pub struct MessageHandler {
    store: Arc<dyn OtpStore>,
    replier: Option<Arc<dyn ReplySender>>,
}

impl MessageHandler {
    /// Silent ingestion: codes are stored and nothing is sent back.
    pub fn new(store: Arc<dyn OtpStore>) -> Self {
        Self {
            store,
            replier: None,
        }
    }

    /// Answer every text message through `replier`.
    pub fn with_replies(mut self, replier: Arc<dyn ReplySender>) -> Self {
        self.replier = Some(replier);
        self
    }

    pub fn replies_enabled(&self) -> bool {
        self.replier.is_some()
    }

    /// Store the first code found in `text`, if any.
    ///
    /// `Ok(None)` is the normal outcome for a message without a code; the
    /// slot is left untouched in that case.
    pub async fn extract_and_store(&self, text: &str) -> Result<Option<OtpCode>, StoreError> {
        let Some(code) = extract_otp(text) else {
            info!(text_length = text.len(), "otp_not_found");
            debug!(text = %text, "otp_not_found_text");
            return Ok(None);
        };

        let store = Arc::clone(&self.store);
        let to_write = code.clone();
        tokio::task::spawn_blocking(move || store.put(&to_write))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))??;

        info!(otp = %code, "otp_stored");
        Ok(Some(code))
    }

    /// Process one text message event.
    pub async fn handle_text(&self, event: &MessageEvent) -> Result<Option<OtpCode>, StoreError> {
        let code = self.extract_and_store(&event.text).await?;
        self.reply(event, code.as_ref()).await;
        Ok(code)
    }

    async fn reply(&self, event: &MessageEvent, code: Option<&OtpCode>) {
        let Some(replier) = &self.replier else {
            return;
        };
        let Some(reply_token) = event.reply_token.as_deref() else {
            debug!("reply_skipped_no_token");
            return;
        };

        let text = match code {
            Some(code) => stored_reply(code),
            None => NO_MATCH_REPLY.to_string(),
        };

        if let Err(e) = replier.send_reply(reply_token, &text).await {
            warn!(error = %e, otp_found = code.is_some(), "reply_failed");
        }
    }
}
