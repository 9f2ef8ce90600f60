//! Observability for the contract scanner: logging, metrics and the failed-unit log.

pub mod failures;
pub mod logging;
pub mod metrics;

pub use failures::append_failed_unit;
pub use logging::init_logging;
pub use metrics::Metrics;
