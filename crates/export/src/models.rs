//! Contract record produced by a scan.

use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Placeholder written for fields that are unknown for a record.
pub const NOT_AVAILABLE: &str = "N/A";

/// One discovered contract.
///
/// Records are built once during a scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRecord {
    /// EIP-55 checksummed address.
    pub address: String,
    /// Deployed bytecode as `0x`-prefixed hex.
    pub bytecode: String,
    /// Balance in ether with six fractional digits.
    pub balance: String,
    #[serde(serialize_with = "or_not_available")]
    pub creation_timestamp: Option<String>,
    #[serde(serialize_with = "or_not_available")]
    pub creation_block: Option<u64>,
    #[serde(serialize_with = "or_not_available")]
    pub last_interaction_timestamp: Option<String>,
}

impl ContractRecord {
    /// Record for a contract deployed in a scanned block.
    ///
    /// The creation block is also the last known interaction.
    pub fn created_in_block(
        address: String,
        bytecode: String,
        balance: String,
        block_number: u64,
        block_timestamp: String,
    ) -> Self {
        Self {
            address,
            bytecode,
            balance,
            creation_timestamp: Some(block_timestamp.clone()),
            creation_block: Some(block_number),
            last_interaction_timestamp: Some(block_timestamp),
        }
    }

    /// Record for a contract looked up by address, with no creation history.
    pub fn from_lookup(address: String, bytecode: String, balance: String) -> Self {
        Self {
            address,
            bytecode,
            balance,
            creation_timestamp: None,
            creation_block: None,
            last_interaction_timestamp: None,
        }
    }
}

fn or_not_available<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_str(NOT_AVAILABLE),
    }
}
