// Ethereum primitives and node errors

pub mod address;
pub mod amount;

pub use address::{parse_address, parse_tx_hash, AddressError};
pub use alloy::primitives::{Address, B256, U256};
pub use amount::{AmountError, EthAmount};

use thiserror::Error;

/// Error type for node and contract operations
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    #[error("Transaction not confirmed: {0}")]
    Confirmation(#[from] alloy::providers::PendingTransactionError),

    #[error("Transaction {0} reverted")]
    Reverted(B256),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Expected event not found in receipt of {0}")]
    MissingEvent(B256),

    #[error("Not configured: {0}")]
    NotConfigured(String),
}
