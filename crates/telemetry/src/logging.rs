//! Structured logging setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging with environment-based filtering.
///
/// Output goes to stderr so that interactive prompts on stdout are not
/// interleaved with log lines.
///
/// # Arguments
/// * `log_level` - Optional log level override (e.g., "info", "debug", "error")
/// * `json` - Emit JSON lines instead of human-readable text
pub fn init_logging(log_level: Option<&str>, json: bool) -> anyhow::Result<()> {
    let filter = if let Some(level) = log_level {
        EnvFilter::try_new(level)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
