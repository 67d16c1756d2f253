//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// A newly produced block as announced by a `newHeads` subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
}

/// A block with full transaction bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub number: u64,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
}

/// The parts of a mined transaction the tracker reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub hash: TxHash,
    pub from: Address,
    /// `None` for contract creation.
    pub to: Option<Address>,
    /// Wei per gas actually paid.
    pub gas_price: u128,
    pub block_number: Option<u64>,
}

/// Post-execution data for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub gas_used: u64,
}

/// One item delivered by the header subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    /// A new block header.
    Header(BlockHeader),
    /// An asynchronous error reported by the transport.
    Error(String),
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Subscription could not be established.
    #[error("Subscription error: {0}")]
    Subscription(String),

    /// The node returned no block for the requested number.
    #[error("Block {0} not found")]
    BlockNotFound(u64),

    /// The node returned no receipt for the transaction.
    #[error("Receipt for transaction {0} not found")]
    ReceiptNotFound(TxHash),

    /// No provider API key was configured.
    #[error("Provider API key is not configured")]
    MissingApiKey,

    /// The endpoint URL could not be parsed.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

/// Result type for blockchain operations.
pub type ChainResult<T> = Result<T, ChainError>;
