//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::TrackerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Names the optional TOML configuration file.
pub const CONFIG_PATH_ENV_VAR: &str = "DEPOSIT_TRACKER_CONFIG";
pub const BOT_TOKEN_ENV_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_ENV_VAR: &str = "TELEGRAM_CHAT_ID";
pub const API_KEY_ENV_VAR: &str = "ALCHEMY_API_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<TrackerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay credentials from an environment lookup.
///
/// Non-empty values replace whatever the file provided.
pub fn apply_env_overrides<F>(config: &mut TrackerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(token) = non_empty(BOT_TOKEN_ENV_VAR) {
        config.telegram.bot_token = token;
    }
    if let Some(chat_id) = non_empty(CHAT_ID_ENV_VAR) {
        config.telegram.chat_id = chat_id;
    }
    if let Some(key) = non_empty(API_KEY_ENV_VAR) {
        config.provider.api_key = key;
    }
}

/// Load configuration from the optional file, the process environment, then validate.
pub fn load_config() -> Result<TrackerConfig, ConfigError> {
    let mut config = match std::env::var(CONFIG_PATH_ENV_VAR) {
        Ok(path) if !path.is_empty() => read_config_file(Path::new(&path))?,
        _ => TrackerConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
