//! Prometheus metrics for contract scanning.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
};

/// Metrics collector for a scanner run.
///
/// Each instance owns its own registry, so several collectors can coexist in
/// one process (tests build one per case).
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    blocks_scanned: IntCounter,
    addresses_scanned: IntCounter,
    contracts_found: IntCounter,
    units_skipped: IntCounter,
    rpc_errors: IntCounter,
    rpc_latency: HistogramVec,
}

impl Metrics {
    /// Create a new metrics instance.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let blocks_scanned = IntCounter::new(
            "contract_scanner_blocks_scanned_total",
            "Total number of blocks scanned successfully",
        )?;
        registry.register(Box::new(blocks_scanned.clone()))?;

        let addresses_scanned = IntCounter::new(
            "contract_scanner_addresses_scanned_total",
            "Total number of addresses inspected successfully",
        )?;
        registry.register(Box::new(addresses_scanned.clone()))?;

        let contracts_found = IntCounter::new(
            "contract_scanner_contracts_found_total",
            "Total number of contract records produced",
        )?;
        registry.register(Box::new(contracts_found.clone()))?;

        let units_skipped = IntCounter::new(
            "contract_scanner_units_skipped_total",
            "Total number of blocks or addresses skipped after an error",
        )?;
        registry.register(Box::new(units_skipped.clone()))?;

        let rpc_errors = IntCounter::new(
            "contract_scanner_rpc_errors_total",
            "Total number of RPC errors",
        )?;
        registry.register(Box::new(rpc_errors.clone()))?;

        let rpc_latency = HistogramVec::new(
            HistogramOpts::from(Opts::new(
                "contract_scanner_rpc_latency_seconds",
                "RPC call latency in seconds",
            )),
            &["method"],
        )?;
        registry.register(Box::new(rpc_latency.clone()))?;

        Ok(Self {
            registry,
            blocks_scanned,
            addresses_scanned,
            contracts_found,
            units_skipped,
            rpc_errors,
            rpc_latency,
        })
    }

    pub fn inc_blocks_scanned(&self) {
        self.blocks_scanned.inc();
    }

    pub fn inc_addresses_scanned(&self) {
        self.addresses_scanned.inc();
    }

    pub fn inc_contracts_found(&self, count: u64) {
        self.contracts_found.inc_by(count);
    }

    pub fn inc_units_skipped(&self) {
        self.units_skipped.inc();
    }

    pub fn inc_rpc_errors(&self) {
        self.rpc_errors.inc();
    }

    /// Record RPC latency for a JSON-RPC method.
    pub fn observe_rpc_latency(&self, method: &str, duration_secs: f64) {
        self.rpc_latency.with_label_values(&[method]).observe(duration_secs);
    }

    pub fn contracts_found(&self) -> u64 {
        self.contracts_found.get()
    }

    pub fn units_skipped(&self) -> u64 {
        self.units_skipped.get()
    }

    /// Get the metrics in Prometheus text exposition format.
    pub fn gather(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn independent_instances_do_not_collide() {
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();

        first.inc_contracts_found(3);
        second.inc_units_skipped();

        assert_eq!(first.contracts_found(), 3);
        assert_eq!(first.units_skipped(), 0);
        assert_eq!(second.contracts_found(), 0);
        assert_eq!(second.units_skipped(), 1);
    }

    #[test]
    fn gather_exposes_counters() {
        let metrics = Metrics::new().unwrap();
        metrics.inc_blocks_scanned();
        metrics.observe_rpc_latency("eth_getCode", 0.01);

        let body = metrics.gather().unwrap();
        assert!(body.contains("contract_scanner_blocks_scanned_total 1"));
        assert!(body.contains("method=\"eth_getCode\""));
    }
}
