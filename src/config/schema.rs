//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tracker.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Beacon-chain deposit contract on Ethereum mainnet.
pub const DEPOSIT_CONTRACT_ADDRESS: &str = "0x00000000219ab540356cBB839Cbe05303d7705Fa";

/// Root configuration for the deposit tracker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrackerConfig {
    /// Upstream websocket provider.
    pub provider: ProviderConfig,

    /// Telegram notification target.
    pub telegram: TelegramConfig,

    /// Watched address and subscription behaviour.
    pub watcher: WatcherConfig,

    /// Log sinks.
    pub logging: LoggingConfig,
}

/// Upstream chain-data provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Websocket endpoint without the API key path segment.
    pub ws_endpoint: String,

    /// Provider API key, appended to the endpoint as the last path segment.
    pub api_key: String,
}

impl ProviderConfig {
    /// Full websocket URL including the API key.
    pub fn ws_url(&self) -> String {
        format!("{}/{}", self.ws_endpoint.trim_end_matches('/'), self.api_key)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            ws_endpoint: "wss://eth-mainnet.g.alchemy.com/v2".to_string(),
            api_key: String::new(),
        }
    }
}

/// Telegram Bot API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API base URL.
    pub api_base: String,

    /// Bot token issued by BotFather.
    pub bot_token: String,

    /// Destination chat or channel identifier.
    pub chat_id: String,
}

impl TelegramConfig {
    /// Both credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
        }
    }
}

/// Watcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Recipient address to match, any letter case.
    pub watched_address: String,

    /// Reconnect and resubscribe when the header stream ends.
    pub resubscribe: bool,

    /// Base delay for resubscribe backoff in milliseconds.
    pub resubscribe_base_delay_ms: u64,

    /// Maximum delay for resubscribe backoff in milliseconds.
    pub resubscribe_max_delay_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            watched_address: DEPOSIT_CONTRACT_ADDRESS.to_string(),
            resubscribe: false,
            resubscribe_base_delay_ms: 1000,
            resubscribe_max_delay_ms: 60_000,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive when `RUST_LOG` is unset.
    pub level: String,

    /// Append-only JSON lines file.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: "deposit-tracker.log".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.watcher.watched_address, DEPOSIT_CONTRACT_ADDRESS);
        assert!(!config.watcher.resubscribe);
        assert_eq!(config.logging.file, "deposit-tracker.log");
        assert_eq!(config.telegram.api_base, "https://api.telegram.org");
        assert!(!config.telegram.is_configured());
    }

    #[test]
    fn test_ws_url_appends_key() {
        let provider = ProviderConfig {
            ws_endpoint: "wss://eth-mainnet.g.alchemy.com/v2/".to_string(),
            api_key: "abc".to_string(),
        };
        assert_eq!(provider.ws_url(), "wss://eth-mainnet.g.alchemy.com/v2/abc");
    }

    #[test]
    fn test_partial_toml() {
        let config: TrackerConfig = toml::from_str(
            r#"
            [watcher]
            resubscribe = true

            [telegram]
            chat_id = "-100123"
            "#,
        )
        .unwrap();
        assert!(config.watcher.resubscribe);
        assert_eq!(config.watcher.resubscribe_max_delay_ms, 60_000);
        assert_eq!(config.telegram.chat_id, "-100123");
        assert_eq!(config.logging.level, "info");
    }
}
