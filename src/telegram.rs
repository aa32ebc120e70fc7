//! Telegram Bot API transport
//!
//! A narrow client over the two methods the bot uses: `getUpdates` long
//! polling and `sendMessage`. Wire types cover only the fields we read;
//! everything else in an update is ignored.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::text;

/// Server-side long-poll window for `getUpdates`, in seconds
const POLL_TIMEOUT_SECS: u64 = 30;

/// Client-side request timeout. Must sit above the long-poll window or
/// every quiet poll turns into a timeout error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(40);

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Transport fault with a coarse classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection problems, timeouts, 5xx responses
    Network,
    /// The Bot API rejected the call
    Api,
    /// A payload we could not make sense of
    InvalidResponse,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Api,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::InvalidResponse,
            message: message.into(),
        }
    }
}

/// Outbound message seam the dispatcher talks through
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyMarkup>,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: MessageSender + ?Sized> MessageSender for Arc<T> {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyMarkup>,
    ) -> Result<(), TransportError> {
        (**self).send_message(chat_id, text, keyboard).await
    }
}

/// Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    /// `api_base` overrides the Bot API host, for tests and proxies.
    pub fn new(token: &str, api_base: Option<&str>) -> Self {
        let base = api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/');
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("{base}/bot{token}"),
        }
    }

    /// Long-poll for updates with ids at or above `offset`. Blocks up to
    /// the poll window server-side when nothing is queued.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: POLL_TIMEOUT_SECS,
            allowed_updates: &["message"],
        };

        let response = self
            .client
            .post(format!("{}/getUpdates", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let envelope: ApiEnvelope<Vec<Update>> = serde_json::from_str(&body).map_err(|e| {
            TransportError::invalid_response(format!("Failed to parse getUpdates response: {e}"))
        })?;
        envelope.into_result()
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyMarkup>,
    ) -> Result<(), TransportError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            reply_markup: keyboard,
        };

        let response = self
            .client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(&body).map_err(|e| {
            TransportError::invalid_response(format!("Failed to parse sendMessage response: {e}"))
        })?;
        envelope.into_result().map(|_| ())
    }
}

fn classify_request_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::network(format!("Request timeout: {error}"))
    } else if error.is_connect() {
        TransportError::network(format!("Connection failed: {error}"))
    } else {
        TransportError::network(format!("Request failed: {error}"))
    }
}

fn classify_status(status: StatusCode, body: &str) -> TransportError {
    // Bot API errors carry a JSON description; fall back to the raw body.
    let description = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.description)
        .unwrap_or_else(|| body.to_string());

    match status.as_u16() {
        401 | 403 => TransportError::api(format!("Authentication failed: {description}")),
        429 => TransportError::api(format!("Rate limited: {description}")),
        500..=599 => TransportError::network(format!("Server error {status}: {description}")),
        _ => TransportError::api(format!("HTTP {status}: {description}")),
    }
}

/// One text message addressed to the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub user_id: i64,
    pub text: String,
}

/// Long-poll cursor over the update stream
pub struct UpdatePoller {
    client: TelegramClient,
    offset: i64,
}

impl UpdatePoller {
    pub fn new(client: TelegramClient) -> Self {
        Self { client, offset: 0 }
    }

    /// Next batch of inbound text messages. May be empty when the poll
    /// window elapses quietly.
    pub async fn next_batch(&mut self) -> Result<Vec<Inbound>, TransportError> {
        let updates = self.client.get_updates(self.offset).await?;
        Ok(drain_updates(updates, &mut self.offset))
    }
}

/// Confirms every update by advancing the offset past it, including
/// updates that carry nothing for the bot.
fn drain_updates(updates: Vec<Update>, offset: &mut i64) -> Vec<Inbound> {
    let mut batch = Vec::new();
    for update in updates {
        *offset = (*offset).max(update.update_id + 1);
        match inbound_from_update(update) {
            Some(inbound) => batch.push(inbound),
            None => tracing::debug!("Skipping update without message text"),
        }
    }
    batch
}

/// The sender id keys both storage and replies. Messages without a sender
/// fall back to the chat id, which is the same thing in a private chat.
fn inbound_from_update(update: Update) -> Option<Inbound> {
    let message = update.message?;
    let text = message.text?;
    let user_id = message
        .from
        .map(|user| user.id)
        .or(message.chat.map(|chat| chat.id))?;
    Some(Inbound { user_id, text })
}

/// The persistent five-button menu shown under the input field
pub fn main_menu() -> ReplyMarkup {
    let rows = [
        vec![text::menu::ADD, text::menu::RECENT],
        vec![text::menu::STATS, text::menu::MOTIVATE],
        vec![text::menu::CLEAR],
    ];

    ReplyMarkup {
        keyboard: rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|label| KeyboardButton {
                        text: label.to_string(),
                    })
                    .collect()
            })
            .collect(),
        resize_keyboard: true,
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a ReplyMarkup>,
}

/// Reply keyboard attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

/// Response envelope every Bot API method wraps its payload in
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn into_result(self) -> Result<T, TransportError> {
        if self.ok {
            self.result
                .ok_or_else(|| TransportError::invalid_response("ok response without a result"))
        } else {
            Err(TransportError::api(self.description.unwrap_or_else(|| {
                "unknown Bot API error".to_string()
            })))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}
