//! Address list input files.

use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Read contract addresses from a text file, one per line.
///
/// Blank lines and lines starting with `#` are ignored. Repeated addresses
/// are dropped case-insensitively, keeping the first occurrence. A missing
/// or unreadable file yields an empty list.
pub fn read_addresses<P: AsRef<Path>>(path: P) -> Vec<String> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Cannot read address file {:?}: {}", path, e);
            return Vec::new();
        }
    };

    let addresses = parse_addresses(&content);
    info!("Read {} addresses from {:?}", addresses.len(), path);
    addresses
}

fn parse_addresses(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(line.to_lowercase()))
        .map(String::from)
        .collect()
}
