//! Websocket JSON-RPC client.
//!
//! # Responsibilities
//! - Connect to the provider websocket endpoint
//! - Open the `newHeads` subscription
//! - Fetch blocks, receipts and timestamps for the watcher
//! - Translate alloy RPC types into the tracker's own types

use alloy::consensus::Transaction as ConsensusTransaction;
use alloy::eips::BlockNumberOrTag;
use alloy::network::TransactionResponse;
use alloy::primitives::TxHash;
use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use alloy::rpc::types::BlockTransactions;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::subscription::{head_events, HeadStream};
use crate::blockchain::types::{
    Block, ChainError, ChainResult, Transaction, TransactionReceipt,
};
use crate::blockchain::ChainSource;
use crate::config::ProviderConfig;

/// Blockchain client over a single websocket connection.
#[derive(Clone)]
pub struct ChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    /// Endpoint without the API key, safe to log.
    endpoint: String,
}

impl ChainClient {
    /// Connect to the provider websocket.
    ///
    /// # Arguments
    /// * `config` - Provider endpoint and API key
    pub async fn connect(config: &ProviderConfig) -> ChainResult<Self> {
        if config.api_key.is_empty() {
            return Err(ChainError::MissingApiKey);
        }
        let ws_url = config.ws_url();
        url::Url::parse(&ws_url)
            .map_err(|e| ChainError::InvalidUrl(format!("{}: {}", config.ws_endpoint, e)))?;

        let provider = ProviderBuilder::new()
            .connect_ws(WsConnect::new(ws_url))
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        tracing::info!(endpoint = %config.ws_endpoint, "Blockchain client connected");

        Ok(Self {
            provider: Arc::new(provider),
            endpoint: config.ws_endpoint.clone(),
        })
    }

    /// Subscribe to new block headers.
    pub async fn subscribe_new_heads(&self) -> ChainResult<HeadStream> {
        let subscription = self
            .provider
            .subscribe_blocks()
            .await
            .map_err(|e| ChainError::Subscription(e.to_string()))?;

        tracing::info!(endpoint = %self.endpoint, "Subscribed to new block headers");
        Ok(head_events(subscription))
    }
}

#[async_trait]
impl ChainSource for ChainClient {
    async fn block_with_transactions(&self, number: u64) -> ChainResult<Block> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .full()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .ok_or(ChainError::BlockNotFound(number))?;

        let transactions = match block.transactions {
            BlockTransactions::Full(txs) => txs.iter().map(to_transaction).collect(),
            _ => Vec::new(),
        };

        Ok(Block {
            number: block.header.inner.number,
            timestamp: block.header.inner.timestamp,
            transactions,
        })
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<TransactionReceipt> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .ok_or(ChainError::ReceiptNotFound(hash))?;

        Ok(TransactionReceipt {
            gas_used: receipt.gas_used,
        })
    }

    async fn block_timestamp(&self, number: u64) -> ChainResult<u64> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?
            .ok_or(ChainError::BlockNotFound(number))?;

        Ok(block.header.inner.timestamp)
    }
}

fn to_transaction(tx: &alloy::rpc::types::Transaction) -> Transaction {
    // Mined EIP-1559 transactions report the effective price; legacy ones carry it directly.
    let gas_price = tx
        .effective_gas_price
        .or_else(|| ConsensusTransaction::gas_price(tx))
        .unwrap_or_else(|| ConsensusTransaction::max_fee_per_gas(tx));

    Transaction {
        hash: TransactionResponse::tx_hash(tx),
        from: TransactionResponse::from(tx),
        to: ConsensusTransaction::to(tx),
        gas_price,
        block_number: tx.block_number,
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
