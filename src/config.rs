//! Configuration System
//!
//! Session configuration for the monitor: the root to watch, the polling
//! interval, the audit log destination, and ignore patterns. Loadable from a
//! TOML file with CLI flags taking precedence, validated before a session
//! starts so a missing root fails at initialization rather than mid-pass.

use crate::error::MonitorError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Monitoring session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Root directory to monitor
    pub root: PathBuf,

    /// Seconds to wait between polling passes
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Audit log destination
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Directory or file names excluded from monitoring
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

fn default_interval_secs() -> u64 {
    10
}

fn default_report_path() -> PathBuf {
    PathBuf::from("DirectoryChangeReport.csv")
}

fn default_ignore() -> Vec<String> {
    vec![
        ".git".to_string(),
        "target".to_string(),
        "node_modules".to_string(),
    ]
}

impl MonitorConfig {
    /// Configuration with defaults for the given root
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            interval_secs: default_interval_secs(),
            report_path: default_report_path(),
            ignore: default_ignore(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, MonitorError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Validate the configuration before starting a session
    pub fn validate(&self) -> Result<(), MonitorError> {
        let metadata = std::fs::metadata(&self.root)
            .map_err(|_| MonitorError::RootNotFound(self.root.clone()))?;
        if !metadata.is_dir() {
            return Err(MonitorError::RootNotADirectory(self.root.clone()));
        }
        Ok(())
    }

    /// Polling interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
