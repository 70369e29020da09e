//! Outbound replies through the LINE Messaging API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;
use url::Url;

use crate::error::ReplyError;

/// Anything that can answer a message given its reply token.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_reply(&self, reply_token: &str, text: &str) -> Result<(), ReplyError>;
}

/// Reply API request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// HTTP client for `POST /v2/bot/message/reply`.
#[derive(Clone)]
pub struct LineReplyClient {
    http: Client,
    endpoint: String,
    access_token: String,
}

impl LineReplyClient {
    /// Build a client against `api_base` (normally `https://api.line.me`).
    pub fn new(api_base: &Url, access_token: String, timeout: Duration) -> Result<Self, ReplyError> {
        let http = Client::builder().timeout(timeout).build()?;
        let endpoint = format!(
            "{}/v2/bot/message/reply",
            api_base.as_str().trim_end_matches('/')
        );

        Ok(Self {
            http,
            endpoint,
            access_token,
        })
    }
}

#[async_trait]
impl ReplySender for LineReplyClient {
    async fn send_reply(&self, reply_token: &str, text: &str) -> Result<(), ReplyError> {
        let body = ReplyRequest {
            reply_token,
            messages: [TextMessage { kind: "text", text }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReplyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(status_code = status.as_u16(), "line_reply_sent");
        Ok(())
    }
}
