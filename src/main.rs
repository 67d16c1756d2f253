//! Ethereum Deposit Tracker
//!
//! Watches new blocks for transactions sent to the beacon-chain deposit
//! contract and reports each one to Telegram.
//!
//! # Architecture Overview
//!
//! ```text
//!   Provider websocket ──newHeads──▶ DepositWatcher ──per block──▶ ChainSource
//!                                          │                     (block, receipt,
//!                                          │                      timestamp)
//!                                          ▼
//!                                    DepositDetails ──message──▶ TelegramNotifier
//!
//!   every step ──▶ tracing (JSON lines) ──▶ stdout + deposit-tracker.log
//! ```

use deposit_tracker::config::{load_config, missing_credentials};
use deposit_tracker::lifecycle::Tracker;
use deposit_tracker::observability::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    init_logging(&config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        watched_address = %config.watcher.watched_address,
        resubscribe = config.watcher.resubscribe,
        log_file = %config.logging.file,
        "deposit-tracker starting"
    );

    for field in missing_credentials(&config) {
        tracing::warn!(field, "Credential is not configured");
    }

    let mut tracker = Tracker::new(config);
    let state = tracker.run().await;

    // The process stays alive but idle; it is stopped externally.
    tracing::warn!(state = ?state, "Tracker is idle; no further blocks will be processed");
    std::future::pending::<()>().await;

    Ok(())
}
