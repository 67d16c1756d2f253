//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file ($DEPOSIT_TRACKER_CONFIG)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (TELEGRAM_BOT_TOKEN, TELEGRAM_CHAT_ID, ALCHEMY_API_KEY)
//!     → validation.rs (semantic checks; absent credentials only warn)
//!     → TrackerConfig (validated, immutable)
//!     → passed by reference to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    LoggingConfig, ProviderConfig, TelegramConfig, TrackerConfig, WatcherConfig,
    DEPOSIT_CONTRACT_ADDRESS,
};
pub use validation::{missing_credentials, ValidationError};
