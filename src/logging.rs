//! Logging setup for the binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! caller's choice. Log output goes to stderr so JSON reports on stdout
//! stay machine-readable.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "EXPLAINCODE_LOG";

/// Default level when `EXPLAINCODE_LOG` is unset.
pub fn default_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    Ok(())
}
