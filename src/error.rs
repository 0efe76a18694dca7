//! Error types for the directory integrity monitor.

use std::path::PathBuf;
use thiserror::Error;

/// Monitoring session errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Monitored root not found: {0:?}")]
    RootNotFound(PathBuf),

    #[error("Monitored root is not a directory: {0:?}")]
    RootNotADirectory(PathBuf),

    #[error("Audit log failure for {path:?}: {source}")]
    AuditLog {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for MonitorError {
    fn from(err: toml::de::Error) -> Self {
        MonitorError::Config(err.to_string())
    }
}
