//! Append-only log of units (blocks or addresses) that failed during a scan.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Append a failed unit to the failure log, one per line.
///
/// Does nothing when `path` is `None` or the unit is blank, so callers can
/// pass their optional setting straight through.
///
/// # Arguments
/// * `path` - Path to the failure log
/// * `unit` - Block number or address that failed
pub fn append_failed_unit<P: AsRef<Path>>(path: Option<P>, unit: &str) -> anyhow::Result<()> {
    let unit = unit.trim();
    if unit.is_empty() {
        return Ok(());
    }
    if let Some(log_path) = path {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        writeln!(file, "{}", unit)?;
        debug!("Recorded failed unit {} in {:?}", unit, log_path.as_ref());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_unit_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed.txt");

        append_failed_unit(Some(&path), "1024").unwrap();
        append_failed_unit(Some(&path), "  0xdeadbeef \n").unwrap();
        append_failed_unit(Some(&path), "   ").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1024\n0xdeadbeef\n");
    }

    #[test]
    fn no_path_is_a_no_op() {
        append_failed_unit(None::<&Path>, "1024").unwrap();
    }
}
