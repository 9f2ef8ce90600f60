//! Chain data types and the read interface the scanner depends on.

use alloy::primitives::{Address, Bytes, B256, U256, U64};
use async_trait::async_trait;
use serde::Deserialize;

/// Error type for chain reads.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("RPC request failed with status: {0}")]
    Status(reqwest::StatusCode),
    #[error("RPC error from node: {0}")]
    Node(String),
    #[error("Invalid RPC response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for chain reads.
pub type RpcResult<T> = Result<T, RpcError>;

/// Block as returned by `eth_getBlockByNumber` with full transactions.
///
/// Only the fields needed for contract discovery are decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub number: U64,
    pub timestamp: U64,
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
}

impl RpcBlock {
    /// Transactions with no destination, i.e. contract deployments.
    pub fn creation_transactions(&self) -> impl Iterator<Item = &RpcTransaction> {
        self.transactions.iter().filter(|tx| tx.is_contract_creation())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: B256,
    #[serde(default)]
    pub to: Option<Address>,
}

impl RpcTransaction {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

/// Receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub contract_address: Option<Address>,
}

/// Read-only access to the chain.
///
/// `RpcClient` is the production implementation; tests substitute an
/// in-memory chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Latest block number known to the node.
    async fn latest_block_number(&self) -> RpcResult<u64>;

    /// Block with full transaction objects, or `None` if the node does not have it.
    async fn block_with_transactions(&self, number: u64) -> RpcResult<Option<RpcBlock>>;

    /// Receipt for a mined transaction, or `None` if unknown.
    async fn transaction_receipt(&self, hash: B256) -> RpcResult<Option<RpcReceipt>>;

    /// Deployed bytecode at the latest block. Empty for externally owned accounts.
    async fn code_at(&self, address: Address) -> RpcResult<Bytes>;

    /// Balance in wei at the latest block.
    async fn balance_of(&self, address: Address) -> RpcResult<U256>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_block_and_detects_creations() {
        let block: RpcBlock = serde_json::from_value(json!({
            "number": "0xb443",
            "timestamp": "0x55c42659",
            "hash": "0x4e3a3754410177e6937ef1f84bba68ea139e8d1a2258c5f85db9f1cd715a1bdd",
            "transactions": [
                {
                    "hash": "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060",
                    "from": "0xa1e4380a3b1f749673e270229993ee55f35663b4",
                    "to": "0x5df9b87991262f6ba471f09758cde1c0fc1de734",
                    "value": "0x7a69"
                },
                {
                    "hash": "0x9fc76417374aa880d4449a1f7f31ec597f00b1f6f3dd2d66f4c9c6c445836d8b",
                    "from": "0xa1e4380a3b1f749673e270229993ee55f35663b4",
                    "to": null,
                    "input": "0x6060"
                }
            ]
        }))
        .unwrap();

        assert_eq!(block.number.to::<u64>(), 46147);
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(block.creation_transactions().count(), 1);
    }

    #[test]
    fn decodes_receipt_without_contract_address() {
        let receipt: RpcReceipt = serde_json::from_value(json!({
            "transactionHash": "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060",
            "contractAddress": null,
            "status": "0x1"
        }))
        .unwrap();
        assert!(receipt.contract_address.is_none());
    }
}
