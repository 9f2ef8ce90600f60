//! CSV exporter for contract records.

use crate::models::ContractRecord;
use std::path::Path;
use tracing::{info, warn};

/// Fixed column set of the exported file, in order.
pub const COLUMNS: [&str; 6] = [
    "address",
    "bytecode",
    "balance",
    "creation_timestamp",
    "creation_block",
    "last_interaction_timestamp",
];

/// Write records to a CSV file with a header row.
///
/// When `records` is empty nothing is written and no file is created.
///
/// # Returns
/// The number of data rows written
pub fn export_to_csv<P: AsRef<Path>>(records: &[ContractRecord], path: P) -> anyhow::Result<usize> {
    let path = path.as_ref();
    if records.is_empty() {
        warn!("No contract records to export, skipping {:?}", path);
        return Ok(0);
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Exported {} contract records to {:?}", records.len(), path);
    Ok(records.len())
}
