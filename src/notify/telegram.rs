//! Telegram Bot API notifier.
//!
//! Sends plain-text messages through the `sendMessage` method:
//!
//! ```text
//!   POST {api_base}/bot<token>/sendMessage
//!   {"chat_id": "...", "text": "..."}
//!   → {"ok": true, ...} | {"ok": false, "description": "..."}
//! ```
//!
//! One attempt per message. There is no retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::TelegramConfig;
use crate::notify::{Notifier, NotifyOutcome};

/// The subset of a Bot API response the notifier reads.
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram notifier for deposit messages.
#[derive(Clone)]
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: Client,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("configured", &self.is_configured())
            .field("api_base", &self.config.api_base)
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Use a preconfigured HTTP client (proxy settings, TLS roots).
    pub fn with_client(config: TelegramConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Check if Telegram is configured
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    /// Send a raw message to Telegram
    pub async fn send_message(&self, text: &str) -> NotifyOutcome {
        if !self.is_configured() {
            let preview: String = text.chars().take(200).collect();
            info!("Telegram not configured, would send: {}", preview);
            return NotifyOutcome::Skipped;
        }

        let response = match self
            .client
            .post(self.send_message_url())
            .json(&json!({
                "chat_id": self.config.chat_id,
                "text": text,
            }))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                // The request URL embeds the bot token.
                let e = e.without_url();
                error!(error = %e, "Error sending Telegram message");
                return NotifyOutcome::Failed(e.to_string());
            }
        };

        let status = response.status();
        match response.json::<SendMessageResponse>().await {
            Ok(body) if body.ok => {
                info!("Telegram message sent successfully.");
                NotifyOutcome::Delivered
            }
            Ok(body) => {
                error!(
                    status = %status,
                    description = body.description.as_deref().unwrap_or("none"),
                    "Error sending Telegram message: {}",
                    body.description.as_deref().unwrap_or("no description")
                );
                NotifyOutcome::Rejected {
                    description: body.description,
                }
            }
            Err(e) => {
                let e = e.without_url();
                error!(status = %status, error = %e, "Error sending Telegram message");
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> NotifyOutcome {
        self.send_message(message).await
    }
}
