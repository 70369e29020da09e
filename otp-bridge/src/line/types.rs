//! LINE webhook body types.
//!
//! The platform sends a JSON envelope with zero or more events. The bridge
//! only cares about text messages, so every event is folded into the closed
//! set [`WebhookEvent`] while deserializing.

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::ParseError;

/// Top-level webhook body.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    /// Bot user ID the events were sent to
    #[serde(default)]
    pub destination: Option<String>,
    /// Events in delivery order (empty for the console's verify request)
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

impl WebhookEnvelope {
    /// Parse a verified raw body.
    pub fn from_slice(body: &[u8]) -> Result<Self, ParseError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// An inbound event, reduced to what the bridge handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// A text message from a user
    TextMessage(MessageEvent),
    /// Follows, postbacks, stickers, images and anything unknown
    Other,
}

/// A text message event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Single-use token authorising one reply
    pub reply_token: Option<String>,
    /// Message body as typed by the user
    pub text: String,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawEvent {
    Message {
        #[serde(default, rename = "replyToken")]
        reply_token: Option<String>,
        message: RawMessage,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawMessage {
    Text { text: String },
    #[serde(other)]
    Other,
}

// Events that do not fit the expected shape map to `Other`.
impl<'de> Deserialize<'de> for WebhookEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let event = match serde_json::from_value::<RawEvent>(value) {
            Ok(RawEvent::Message {
                reply_token,
                message: RawMessage::Text { text },
            }) => WebhookEvent::TextMessage(MessageEvent { reply_token, text }),
            Ok(_) => WebhookEvent::Other,
            Err(e) => {
                warn!(error = %e, "webhook_event_malformed");
                WebhookEvent::Other
            }
        };
        Ok(event)
    }
}
