//! Ethereum Deposit Tracker Library

pub mod blockchain;
pub mod config;
pub mod deposits;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod resilience;

pub use config::schema::TrackerConfig;
pub use deposits::DepositWatcher;
pub use lifecycle::Tracker;
