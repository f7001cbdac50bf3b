use crate::adapters::build_client;
use crate::config::TelegramConfig;
use crate::domain::ports::MessageSender;
use crate::utils::error::{BriefError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Markup mode understood by the Bot API; briefs are always HTML.
pub const PARSE_MODE: &str = "HTML";

#[derive(Debug, Serialize)]
pub struct SendMessagePayload<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'static str,
}

impl<'a> SendMessagePayload<'a> {
    pub fn new(chat_id: &'a str, text: &'a str) -> Self {
        Self {
            chat_id,
            text,
            parse_mode: PARSE_MODE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    result: Option<SentMessage>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram Bot API `sendMessage` for one chat.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
    chat_id: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig, token: &str, chat_id: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_seconds, None)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<i64> {
        // URL 內含 bot token，不可寫入日誌
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let payload = SendMessagePayload::new(&self.chat_id, text);

        tracing::debug!(
            "Sending {} characters to chat {}",
            text.chars().count(),
            self.chat_id
        );
        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(ApiResponse {
                ok: true,
                result: Some(message),
                ..
            }) if status.is_success() => Ok(message.message_id),
            Some(ApiResponse {
                ok: true, result: None, ..
            }) if status.is_success() => Err(BriefError::ResponseShapeError {
                service: "telegram".to_string(),
                message: "sendMessage succeeded without a message id".to_string(),
            }),
            Some(api) => Err(BriefError::UpstreamError {
                service: "telegram".to_string(),
                status: status.as_u16(),
                body: api
                    .description
                    .unwrap_or_else(|| "request rejected".to_string()),
            }),
            None => Err(BriefError::UpstreamError {
                service: "telegram".to_string(),
                status: status.as_u16(),
                body: body.chars().take(300).collect(),
            }),
        }
    }
}
