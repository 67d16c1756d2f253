//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect to the provider and open the header subscription
//! - Hand the subscription to a [`DepositWatcher`]
//! - Optionally resubscribe with backoff when an established stream ends
//!
//! A failed initial setup is never retried.

use alloy::primitives::Address;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::blockchain::{ChainClient, ChainResult, HeadStream};
use crate::config::{ProviderConfig, TrackerConfig};
use crate::deposits::DepositWatcher;
use crate::notify::TelegramNotifier;
use crate::resilience::ResubscribeBackoff;

/// Subscription state. Moves forward once and is never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Unsubscribed,
    Subscribed,
}

/// Top-level tracker owning the configuration.
pub struct Tracker {
    config: TrackerConfig,
    state: TrackerState,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            state: TrackerState::Unsubscribed,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// Track deposits until the subscription is gone for good.
    ///
    /// Returns when the initial setup fails, or when the stream ends and
    /// resubscription is disabled. Nothing here is escalated; every failure
    /// is logged.
    pub async fn run(&mut self) -> TrackerState {
        let watched: Address = match self.config.watcher.watched_address.parse() {
            Ok(address) => address,
            Err(e) => {
                error!(
                    address = %self.config.watcher.watched_address,
                    error = %e,
                    "Error setting up the tracker"
                );
                return self.state;
            }
        };

        let mut session = match connect_and_subscribe(&self.config.provider).await {
            Ok(session) => Some(session),
            Err(e) => {
                error!(error = %e, "Error setting up the tracker");
                return self.state;
            }
        };
        self.state = TrackerState::Subscribed;

        let notifier = TelegramNotifier::new(self.config.telegram.clone());
        let resubscribe = self.config.watcher.resubscribe;
        let mut backoff = ResubscribeBackoff::from_config(&self.config.watcher);

        loop {
            if let Some((client, heads)) = session.take() {
                backoff.reset();
                info!(watched_address = %watched, "Tracking deposits");

                let watcher = DepositWatcher::new(client, notifier.clone(), watched);
                if resubscribe {
                    let in_flight = watcher.run_detached(heads).await;
                    warn!(in_flight, "Header subscription ended");
                } else {
                    watcher.run(heads).await;
                    warn!("Header subscription ended");
                }
            }

            if !resubscribe {
                break;
            }

            let delay = backoff.next_delay();
            info!(
                attempt = backoff.attempt(),
                delay_ms = delay.as_millis() as u64,
                "Resubscribing"
            );
            sleep(delay).await;

            match connect_and_subscribe(&self.config.provider).await {
                Ok(next) => session = Some(next),
                Err(e) => error!(attempt = backoff.attempt(), error = %e, "Resubscribe failed"),
            }
        }

        self.state
    }
}

async fn connect_and_subscribe(config: &ProviderConfig) -> ChainResult<(ChainClient, HeadStream)> {
    let client = ChainClient::connect(config).await?;
    let heads = client.subscribe_new_heads().await?;
    Ok((client, heads))
}
