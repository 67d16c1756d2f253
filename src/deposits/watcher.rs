//! Deposit watcher.
//!
//! Drives per-block handling from a stream of subscription events:
//!
//! ```text
//! SubscriptionEvent::Header(N)
//!     → spawn block task (blocks may overlap)
//!         → fetch block N with transactions
//!         → for each tx with to == watched address: spawn deposit task
//!             → receipt + timestamp → DepositDetails → log → notify
//!         → join deposit tasks
//! SubscriptionEvent::Error(e)
//!     → log, keep consuming
//! ```
//!
//! Every failure below the event loop ends in a log line.

use std::sync::Arc;

use alloy::primitives::Address;
use futures_util::{Stream, StreamExt};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use crate::blockchain::{BlockHeader, ChainSource, SubscriptionEvent, Transaction};
use crate::deposits::types::{
    deposit_message, fee_wei, wei_to_ether_string, DepositDetails, DepositError,
};
use crate::notify::{Notifier, NotifyOutcome};

/// True when the transaction is sent to `watched`.
///
/// Addresses are compared as bytes, so the hex letter case of either side is irrelevant.
pub fn is_match(tx: &Transaction, watched: &Address) -> bool {
    tx.to.as_ref() == Some(watched)
}

/// Everything a block or deposit task needs, shared across tasks.
pub struct WatchContext<C, N> {
    pub chain: C,
    pub notifier: N,
    pub watched_address: Address,
}

impl<C: ChainSource, N: Notifier> WatchContext<C, N> {
    /// Fetch, scan and report one block.
    ///
    /// Returns the number of matching transactions, or `None` if the block
    /// could not be fetched.
    pub async fn handle_block(self: Arc<Self>, header: BlockHeader) -> Option<usize> {
        let block = match self.chain.block_with_transactions(header.number).await {
            Ok(block) => block,
            Err(e) => {
                error!(block_number = header.number, error = %e, "Error processing block");
                return None;
            }
        };

        info!(block_number = block.number, "New block received: {}", block.number);

        let mut deposits = JoinSet::new();
        for tx in block.transactions {
            if !is_match(&tx, &self.watched_address) {
                continue;
            }
            let ctx = Arc::clone(&self);
            let block_number = block.number;
            deposits.spawn(async move {
                let hash = tx.hash;
                if let Err(e) = ctx.process_deposit(tx, block_number).await {
                    error!(tx_hash = %hash, error = %e, "Error processing deposit");
                }
            });
        }

        let matched = deposits.len();
        while let Some(joined) = deposits.join_next().await {
            log_join_error(joined, "deposit");
        }
        Some(matched)
    }

    /// Enrich, log and notify a single matching transaction.
    ///
    /// `header_number` is used for the timestamp lookup when the transaction
    /// does not report its own block number.
    pub async fn process_deposit(
        &self,
        tx: Transaction,
        header_number: u64,
    ) -> Result<NotifyOutcome, DepositError> {
        info!(tx_hash = %tx.hash, "Deposit detected in transaction: {}", tx.hash);

        let block_number = tx.block_number.unwrap_or(header_number);
        let (receipt, block_timestamp) = tokio::try_join!(
            self.chain.transaction_receipt(tx.hash),
            self.chain.block_timestamp(block_number),
        )?;

        let details = DepositDetails {
            block_number,
            block_timestamp,
            fee: wei_to_ether_string(fee_wei(tx.gas_price, receipt.gas_used)),
            hash: tx.hash,
            sender: tx.from,
        };

        info!(
            block_number = details.block_number,
            block_timestamp = details.block_timestamp,
            fee = %details.fee,
            hash = %details.hash,
            sender = %details.sender,
            "Deposit details"
        );

        let message = deposit_message(&details)?;
        Ok(self.notifier.notify(&message).await)
    }
}

fn log_join_error(joined: Result<impl Sized, JoinError>, task: &'static str) {
    if let Err(e) = joined {
        error!(task, error = %e, "Watcher task panicked");
    }
}

/// Consumes header events and dispatches block handling.
pub struct DepositWatcher<C, N> {
    ctx: Arc<WatchContext<C, N>>,
}

impl<C: ChainSource, N: Notifier> DepositWatcher<C, N> {
    pub fn new(chain: C, notifier: N, watched_address: Address) -> Self {
        Self {
            ctx: Arc::new(WatchContext {
                chain,
                notifier,
                watched_address,
            }),
        }
    }

    pub fn context(&self) -> &Arc<WatchContext<C, N>> {
        &self.ctx
    }

    /// Run until the event stream ends, then wait for in-flight blocks.
    ///
    /// Blocks are handled concurrently with no ordering between them.
    pub async fn run<S>(&self, events: S)
    where
        S: Stream<Item = SubscriptionEvent> + Send,
    {
        let mut blocks = self.dispatch(events).await;
        while let Some(joined) = blocks.join_next().await {
            log_join_error(joined, "block");
        }
    }

    /// Run until the event stream ends and return at once.
    ///
    /// Blocks still in flight keep running in the background. Returns how
    /// many were left behind.
    pub async fn run_detached<S>(&self, events: S) -> usize
    where
        S: Stream<Item = SubscriptionEvent> + Send,
    {
        let mut blocks = self.dispatch(events).await;
        let in_flight = blocks.len();
        blocks.detach_all();
        in_flight
    }

    async fn dispatch<S>(&self, events: S) -> JoinSet<Option<usize>>
    where
        S: Stream<Item = SubscriptionEvent> + Send,
    {
        tokio::pin!(events);
        let mut blocks = JoinSet::new();

        loop {
            tokio::select! {
                event = events.next() => match event {
                    Some(SubscriptionEvent::Header(header)) => {
                        let ctx = Arc::clone(&self.ctx);
                        blocks.spawn(ctx.handle_block(header));
                    }
                    Some(SubscriptionEvent::Error(e)) => {
                        error!(error = %e, "Error during subscription");
                    }
                    None => break,
                },
                Some(joined) = blocks.join_next(), if !blocks.is_empty() => {
                    log_join_error(joined, "block");
                }
            }
        }

        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::TxHash;

    fn tx_to(to: Option<Address>) -> Transaction {
        Transaction {
            hash: TxHash::ZERO,
            from: Address::ZERO,
            to,
            gas_price: 1,
            block_number: Some(1),
        }
    }

    #[test]
    fn test_match_ignores_letter_case() {
        let watched: Address = "0x00000000219ab540356cBB839Cbe05303d7705Fa".parse().unwrap();
        let upper: Address = "0x00000000219AB540356CBB839CBE05303D7705FA".parse().unwrap();
        let lower: Address = "0x00000000219ab540356cbb839cbe05303d7705fa".parse().unwrap();

        assert!(is_match(&tx_to(Some(upper)), &watched));
        assert!(is_match(&tx_to(Some(lower)), &watched));
        assert!(is_match(&tx_to(Some(watched)), &upper));
    }

    #[test]
    fn test_no_match_for_other_or_missing_recipient() {
        let watched: Address = "0x00000000219ab540356cBB839Cbe05303d7705Fa".parse().unwrap();
        assert!(!is_match(&tx_to(Some(Address::repeat_byte(0x11))), &watched));
        assert!(!is_match(&tx_to(None), &watched));
    }
}
