//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Provider websocket (newHeads)
//!     → subscription.rs (header / error events)
//!     → deposits::watcher (per-block handling)
//!     → ChainSource (block, receipt, timestamp lookups)
//! ```
//!
//! # Constraints
//! - Never log the provider API key
//! - Calls are not time-bounded; a stalled call stalls only its own task

pub mod client;
pub mod subscription;
pub mod types;

use alloy::primitives::TxHash;
use async_trait::async_trait;

pub use client::ChainClient;
pub use subscription::{head_events, HeadStream, HeaderSource};
pub use types::{
    Block, BlockHeader, ChainError, ChainResult, SubscriptionEvent, Transaction,
    TransactionReceipt,
};

/// Read-only chain queries used by the deposit watcher.
#[async_trait]
pub trait ChainSource: Send + Sync + 'static {
    /// Fetch a block with full transaction bodies.
    async fn block_with_transactions(&self, number: u64) -> ChainResult<Block>;

    /// Fetch the receipt of a mined transaction.
    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<TransactionReceipt>;

    /// Fetch only the timestamp of a block.
    async fn block_timestamp(&self, number: u64) -> ChainResult<u64>;
}
