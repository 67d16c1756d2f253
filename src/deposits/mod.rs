//! Deposit detection for the watched address.

pub mod types;
pub mod watcher;

pub use types::{DepositDetails, DepositError};
pub use watcher::{is_match, DepositWatcher, WatchContext};
