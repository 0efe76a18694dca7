//! Append-only CSV audit log
//!
//! The audit log is the durable record of every detected change:
//! `Timestamp,File Path,Change Type` with the change type literals `added`,
//! `modified`, `deleted`. Column order and literals are consumed by
//! downstream tooling and must stay stable. Prior rows are never rewritten
//! or reordered; a pre-existing log is appended to so the history survives
//! process restarts.

use crate::detect::ChangeEvent;
use crate::error::MonitorError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Audit log column headers
const HEADERS: [&str; 3] = ["Timestamp", "File Path", "Change Type"];

/// Timestamp format for audit rows (local time)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Single-writer handle on the audit log file
pub struct AuditLog {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl AuditLog {
    /// Open the audit log at `path`, creating it with a header row if absent
    pub fn open(path: &Path) -> Result<Self, MonitorError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut log = Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file),
            path: path.to_path_buf(),
        };

        if needs_header {
            log.writer
                .write_record(HEADERS)
                .and_then(|_| log.writer.flush().map_err(csv::Error::from))
                .map_err(|source| MonitorError::AuditLog {
                    path: log.path.clone(),
                    source,
                })?;
        }

        Ok(log)
    }

    /// Path of the underlying log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and flush it to disk before returning
    ///
    /// Flushing per record means a crash immediately after a logged alert
    /// cannot lose that alert. A failure here is fatal for the session; the
    /// caller must stop rather than continue silently losing audit records.
    pub fn append(&mut self, event: &ChangeEvent) -> Result<(), MonitorError> {
        self.writer
            .write_record([
                event.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                event.path.display().to_string(),
                event.kind.to_string(),
            ])
            .and_then(|_| self.writer.flush().map_err(csv::Error::from))
            .map_err(|source| MonitorError::AuditLog {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
impl AuditLog {
    /// Writer over an arbitrary open file, so tests can inject write failures
    pub(crate) fn from_file(file: File, path: PathBuf) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file),
            path,
        }
    }
}
