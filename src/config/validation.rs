//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the watched address and endpoint URLs parse
//! - List absent credentials so startup can warn about them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TrackerConfig → Result<(), Vec<ValidationError>>
//! - Absent credentials are not errors: the tracker still starts, fails
//!   setup without an API key, and skips notifications without Telegram
//!   credentials

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::TrackerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid watched address '{0}'")]
    WatchedAddress(String),

    #[error("invalid {field} URL '{value}'")]
    Url { field: &'static str, value: String },

    #[error("resubscribe base delay {base_ms}ms exceeds max delay {max_ms}ms")]
    BackoffRange { base_ms: u64, max_ms: u64 },
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &TrackerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.watcher.watched_address.parse::<Address>().is_err() {
        errors.push(ValidationError::WatchedAddress(
            config.watcher.watched_address.clone(),
        ));
    }

    if url::Url::parse(&config.provider.ws_url()).is_err() {
        errors.push(ValidationError::Url {
            field: "provider.ws_endpoint",
            value: config.provider.ws_endpoint.clone(),
        });
    }
    if url::Url::parse(&config.telegram.api_base).is_err() {
        errors.push(ValidationError::Url {
            field: "telegram.api_base",
            value: config.telegram.api_base.clone(),
        });
    }

    let watcher = &config.watcher;
    if watcher.resubscribe_base_delay_ms > watcher.resubscribe_max_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base_ms: watcher.resubscribe_base_delay_ms,
            max_ms: watcher.resubscribe_max_delay_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Names of the credentials left empty after loading.
pub fn missing_credentials(config: &TrackerConfig) -> Vec<&'static str> {
    [
        ("provider.api_key", config.provider.api_key.is_empty()),
        ("telegram.bot_token", config.telegram.bot_token.is_empty()),
        ("telegram.chat_id", config.telegram.chat_id.is_empty()),
    ]
    .into_iter()
    .filter_map(|(name, missing)| missing.then_some(name))
    .collect()
}
