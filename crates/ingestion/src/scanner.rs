//! Contract discovery over block ranges and address lists.

use crate::chain::{ChainReader, RpcBlock};
use crate::units::{format_ether, format_timestamp};
use alloy::primitives::Address;
use contract_scanner_export::ContractRecord;
use contract_scanner_telemetry::{append_failed_unit, Metrics};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Delay between units used when none is configured.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Sequential contract scanner.
///
/// A unit is one block or one address. Any error inside a unit is logged,
/// the unit is skipped and the scan moves on.
pub struct ContractScanner<C> {
    client: C,
    metrics: Metrics,
    request_delay: Duration,
    failure_log: Option<PathBuf>,
}

impl<C: ChainReader> ContractScanner<C> {
    /// Create a new scanner.
    ///
    /// # Arguments
    /// * `client` - Chain reader used for every RPC call
    /// * `metrics` - Metrics collector
    pub fn new(client: C, metrics: Metrics) -> Self {
        Self {
            client,
            metrics,
            request_delay: DEFAULT_REQUEST_DELAY,
            failure_log: None,
        }
    }

    /// Pause between units, to stay under provider rate limits.
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Append every failed block number or address to this file.
    pub fn with_failure_log(mut self, path: Option<PathBuf>) -> Self {
        self.failure_log = path;
        self
    }

    /// Scan every block in `[start, end]` for contract-creation transactions.
    pub async fn scan_block_range(&self, start: u64, end: u64) -> Vec<ContractRecord> {
        if start > end {
            warn!("Empty block range {}-{}, nothing to scan", start, end);
            return Vec::new();
        }

        info!("Scanning blocks {} to {}", start, end);
        let mut records = Vec::new();

        for block_number in start..=end {
            let before = records.len();
            let outcome = self.scan_block(block_number, &mut records).await;
            self.metrics
                .inc_contracts_found((records.len() - before) as u64);
            match outcome {
                Ok(()) => self.metrics.inc_blocks_scanned(),
                Err(e) => {
                    error!("Failed to scan block {}: {}", block_number, e);
                    self.skip_unit(&block_number.to_string());
                }
            }
            sleep(self.request_delay).await;
        }

        info!(
            "Block scan {}-{} complete: {} contracts found",
            start,
            end,
            records.len()
        );
        records
    }

    /// Look up each address and keep the ones holding code.
    pub async fn scan_addresses(&self, addresses: &[String]) -> Vec<ContractRecord> {
        info!("Scanning {} addresses", addresses.len());
        let total = addresses.len();
        let mut records = Vec::new();

        for (index, raw) in addresses.iter().enumerate() {
            info!("[{}/{}] Scanning address {}", index + 1, total, raw);
            match self.inspect_address(raw).await {
                Ok(Some(record)) => {
                    self.metrics.inc_addresses_scanned();
                    self.metrics.inc_contracts_found(1);
                    records.push(record);
                }
                Ok(None) => {
                    self.metrics.inc_addresses_scanned();
                    warn!("{} is not a contract address", raw);
                }
                Err(e) => {
                    error!("Failed to inspect address {}: {}", raw, e);
                    self.skip_unit(raw);
                }
            }
            sleep(self.request_delay).await;
        }

        info!(
            "Address scan complete: {} of {} addresses are contracts",
            records.len(),
            total
        );
        records
    }

    /// Records are pushed into `records` as they are built, so contracts found
    /// before a failure inside the block are kept.
    async fn scan_block(
        &self,
        block_number: u64,
        records: &mut Vec<ContractRecord>,
    ) -> anyhow::Result<()> {
        let block = self
            .client
            .block_with_transactions(block_number)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Block {} not found", block_number))?;

        info!(
            "Scanning block {} ({} transactions)",
            block_number,
            block.transactions.len()
        );

        self.collect_creations(&block, records).await
    }

    async fn collect_creations(
        &self,
        block: &RpcBlock,
        records: &mut Vec<ContractRecord>,
    ) -> anyhow::Result<()> {
        let block_number = block.number.to::<u64>();
        let block_time = format_timestamp(block.timestamp.to::<u64>())?;

        for tx in block.creation_transactions() {
            let receipt = self
                .client
                .transaction_receipt(tx.hash)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Receipt for {} not found", tx.hash))?;

            let Some(address) = receipt.contract_address else {
                warn!(
                    "Creation transaction {} has no contract address",
                    receipt.transaction_hash
                );
                continue;
            };

            let bytecode = self.client.code_at(address).await?;
            let balance = self.client.balance_of(address).await?;

            records.push(ContractRecord::created_in_block(
                address.to_checksum(None),
                format!("0x{}", hex::encode(bytecode.as_ref())),
                format_ether(balance)?,
                block_number,
                block_time.clone(),
            ));
            info!("Found contract {} in block {}", address, block_number);
        }

        Ok(())
    }

    async fn inspect_address(&self, raw: &str) -> anyhow::Result<Option<ContractRecord>> {
        let address: Address = raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address {}: {}", raw, e))?;

        let bytecode = self.client.code_at(address).await?;
        if bytecode.is_empty() {
            return Ok(None);
        }

        let balance = self.client.balance_of(address).await?;

        Ok(Some(ContractRecord::from_lookup(
            address.to_checksum(None),
            format!("0x{}", hex::encode(bytecode.as_ref())),
            format_ether(balance)?,
        )))
    }

    fn skip_unit(&self, unit: &str) {
        self.metrics.inc_units_skipped();
        if let Err(e) = append_failed_unit(self.failure_log.as_ref(), unit) {
            warn!("Failed to record skipped unit {}: {}", unit, e);
        }
    }
}
