//! LINE Messaging API plumbing: webhook body types and the reply client.

pub mod reply;
pub mod types;

pub use reply::{LineReplyClient, ReplySender};
pub use types::{MessageEvent, WebhookEnvelope, WebhookEvent};
