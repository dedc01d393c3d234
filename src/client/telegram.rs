//! Telegram Bot API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::MessagingApi;
use crate::error::{ApiError, Result};

/// Telegram Bot API host
const API_HOST: &str = "https://api.telegram.org";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Telegram Bot API client
pub struct TelegramClient {
    http: HttpClient,
    base_url: String,
}

/// Standard Telegram response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,

    result: Option<T>,

    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

impl TelegramClient {
    /// Create a new Telegram client for the given bot token.
    ///
    /// `DUEBRIEF_TELEGRAM_API_HOST` overrides the host so tests can point
    /// the client at a local mock server.
    pub fn new(bot_token: &str) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let host = std::env::var("DUEBRIEF_TELEGRAM_API_HOST")
            .map(|host| host.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| API_HOST.to_string());

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", host, bot_token),
        })
    }

    /// POST a Bot API method and unwrap the response envelope
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        payload: serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse {} response: {}", method, e))
        })?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| format!("{} failed with status {}", method, status));
            return Err(ApiError::ServerError(description).into());
        }

        envelope.result.ok_or_else(|| {
            ApiError::InvalidResponse(format!("{} returned ok without a result", method)).into()
        })
    }
}

#[async_trait]
impl MessagingApi for TelegramClient {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<i64> {
        let mut payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(mode) = parse_mode {
            payload["parse_mode"] = serde_json::Value::String(mode.to_string());
        }

        let sent: SentMessage = self.call("sendMessage", payload).await?;
        log::info!("Message sent to chat {} (id {})", chat_id, sent.message_id);
        Ok(sent.message_id)
    }

    async fn delete_message(&self, chat_id: &str, message_id: i64) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });

        // deleteMessage returns a bare boolean result
        let _: bool = self.call("deleteMessage", payload).await?;
        log::info!("Deleted previous message {} in chat {}", message_id, chat_id);
        Ok(())
    }
}
