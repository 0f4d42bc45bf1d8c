//! Telegram Bot API notifier.

use super::Notifier;
use crate::config::TelegramConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Telegram parse mode matching the markup produced by the report renderer.
const PARSE_MODE: &str = "HTML";

#[derive(Debug, Serialize)]
struct SendMessageForm<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Sends reports through `sendMessage` of the Telegram Bot API.
///
/// Every send opens its own HTTP client, independent of the exchange
/// session.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    api_base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    /// Create a notifier from configuration.
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        }
    }

    /// Send one message, returning any transport or API failure.
    #[instrument(skip(self, message), fields(chat_id = %self.chat_id, len = message.len()))]
    pub async fn send_message(&self, message: &str) -> Result<()> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let url = format!("{}/bot{}/sendMessage", self.api_base_url, self.bot_token);
        let form = SendMessageForm {
            chat_id: &self.chat_id,
            text: message,
            parse_mode: PARSE_MODE,
        };

        // Strip the URL from transport errors, it carries the bot token
        let response = http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("Failed to reach Telegram")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error {}: {}", status, body);
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) {
        if self.bot_token.is_empty() || self.chat_id.is_empty() {
            warn!("Telegram credentials are not set; the send will most likely fail");
        }

        match self.send_message(message).await {
            Ok(()) => info!("📤 [NOTIFY] Report delivered to Telegram"),
            Err(e) => error!("❌ [NOTIFY] Telegram delivery failed: {:#}", e),
        }
    }
}
