//! Deposit detection types.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::ChainError;

/// A detected deposit, enriched with receipt and block data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositDetails {
    pub block_number: u64,
    /// Seconds since the Unix epoch.
    pub block_timestamp: u64,
    /// Transaction fee in ether, as an exact decimal string.
    pub fee: String,
    pub hash: TxHash,
    pub sender: Address,
}

/// Why a detected deposit could not be reported.
#[derive(Debug, Error)]
pub enum DepositError {
    #[error("chain lookup failed: {0}")]
    Chain(#[from] ChainError),

    #[error("failed to format deposit details: {0}")]
    Format(#[from] serde_json::Error),
}

/// Fee paid in wei: `gas_price * gas_used`.
pub fn fee_wei(gas_price: u128, gas_used: u64) -> U256 {
    U256::from(gas_price) * U256::from(gas_used)
}

/// Render a wei amount in ether with no trailing zeros.
pub fn wei_to_ether_string(wei: U256) -> String {
    let formatted = format_ether(wei);
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => formatted,
    }
}

/// Plain-text notification body for a deposit.
pub fn deposit_message(details: &DepositDetails) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(details)?;
    Ok(format!(
        "Deposit detected!\nTransaction Hash: {}\nDetails: {}",
        details.hash, json
    ))
}
