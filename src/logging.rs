//! Logging System
//!
//! Structured logging via the `tracing` crate. Log output goes to stderr:
//! stdout is reserved for change alerts, which downstream callers may pipe
//! or capture, and log framing must not interleave with them.

use crate::error::MonitorError;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize the logging system
///
/// The `VIGIL_LOG` environment variable overrides `level` when set, using
/// the usual `EnvFilter` directive syntax.
pub fn init_logging(level: &str) -> Result<(), MonitorError> {
    let filter = EnvFilter::try_from_env("VIGIL_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoLocal::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| MonitorError::Config(format!("Failed to initialize logging: {}", e)))
}
