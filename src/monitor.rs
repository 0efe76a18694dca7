//! Monitor Loop
//!
//! A long-lived session that builds an initial baseline of a directory tree,
//! then repeatedly sleeps, re-samples, diffs against the baseline, and
//! reports every detected change as both a stdout alert and a durable audit
//! log row. Passes are strictly serialized: a new pass never starts before
//! the previous pass's reporting has completed, and the baseline is replaced
//! only after all of a pass's events have been durably logged.

use crate::baseline::{self, Baseline};
use crate::config::MonitorConfig;
use crate::detect::{self, ChangeKind};
use crate::error::MonitorError;
use crate::report::AuditLog;
use crate::walker::{Walker, WalkerConfig};
use chrono::Local;
use parking_lot::{Condvar, Mutex};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Cooperative cancellation handle
///
/// Cloneable; `cancel()` from any thread wakes a session blocked in its
/// waiting state. Used instead of an uncatchable process signal so sessions
/// stop cleanly and tests can drive them directly.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake any waiter
    pub fn cancel(&self) {
        let (flag, condvar) = &*self.inner;
        *flag.lock() = true;
        condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Block for up to `timeout`, returning early if cancelled
    ///
    /// Returns true when cancellation arrived before the timeout elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut cancelled = flag.lock();
        while !*cancelled {
            if condvar.wait_until(&mut cancelled, deadline).timed_out() {
                break;
            }
        }
        *cancelled
    }
}

/// Monitor loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Initializing,
    Waiting,
    Sampling,
    Comparing,
    Reporting,
    Stopped,
}

/// Outcome of one completed polling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    /// Paths enumerated but not observable this pass (left untouched)
    pub failed: usize,
}

impl PassSummary {
    pub fn total_events(&self) -> usize {
        self.added + self.modified + self.deleted
    }
}

/// A single monitoring session
///
/// Owns the baseline, the walker, and the audit log writer; nothing about a
/// session is process-global, so multiple independent sessions can run in
/// one process.
pub struct MonitorSession {
    config: MonitorConfig,
    walker: Walker,
    audit: AuditLog,
    baseline: Baseline,
    cancel: CancelToken,
    state: MonitorState,
}

impl MonitorSession {
    /// Create a session for the given configuration
    ///
    /// Fails fast when the root is missing or the audit log destination is
    /// unwritable; no baseline is installed on failure.
    pub fn new(config: MonitorConfig, cancel: CancelToken) -> Result<Self, MonitorError> {
        config.validate()?;
        let audit = AuditLog::open(&config.report_path)?;

        // Keep the audit log out of its own monitored tree, otherwise every
        // pass would report the log row written by the previous pass. The
        // exclusion is by exact path: a monitored file that merely shares the
        // log's file name elsewhere in the tree stays tracked.
        let exclude_paths = report_path_under_root(&config).into_iter().collect();

        let walker = Walker::with_config(
            config.root.clone(),
            WalkerConfig {
                follow_symlinks: false,
                ignore_patterns: config.ignore.clone(),
                exclude_paths,
            },
        );

        Ok(Self {
            config,
            walker,
            audit,
            baseline: Baseline::new(),
            cancel,
            state: MonitorState::Initializing,
        })
    }

    /// A clone of the session's cancellation token
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Enumerate and hash every path once and install the result as the
    /// baseline for subsequent passes
    pub fn initialize(&mut self) -> Result<(), MonitorError> {
        self.transition(MonitorState::Initializing);
        info!(root = %self.config.root.display(), "Building initial baseline");

        let sample = baseline::sample_tree(&self.walker);
        self.baseline = Baseline::from_sample(sample);

        info!(files = self.baseline.len(), "Baseline installed");
        self.transition(MonitorState::Waiting);
        Ok(())
    }

    /// Run one sample–compare–report pass against the current baseline
    ///
    /// The baseline is replaced only after every event of the pass has been
    /// appended to the audit log; an audit failure leaves the old baseline
    /// in place and is fatal for the session.
    pub fn run_pass(&mut self) -> Result<PassSummary, MonitorError> {
        self.transition(MonitorState::Sampling);
        let sample = baseline::sample_tree(&self.walker);

        self.transition(MonitorState::Comparing);
        let (events, next_baseline) = detect::diff(&self.baseline, &sample, Local::now());

        self.transition(MonitorState::Reporting);
        let mut summary = PassSummary {
            failed: sample.failed.len(),
            ..PassSummary::default()
        };
        for event in &events {
            println!("{}", event.alert_line());
            self.audit.append(event)?;
            match event.kind {
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Modified => summary.modified += 1,
                ChangeKind::Deleted => summary.deleted += 1,
            }
        }

        self.baseline = next_baseline;

        if summary.total_events() > 0 {
            info!(
                added = summary.added,
                modified = summary.modified,
                deleted = summary.deleted,
                failed = summary.failed,
                "Pass detected changes"
            );
        } else {
            debug!(failed = summary.failed, "Pass detected no changes");
        }

        self.transition(MonitorState::Waiting);
        Ok(summary)
    }

    /// Run the monitoring loop until cancelled or an unrecoverable error
    ///
    /// Builds the initial baseline, then alternates between waiting for the
    /// configured interval and running a full pass. Cancellation is observed
    /// during the wait and again before each pass starts. The session ends
    /// in the `Stopped` state whether the loop exits cleanly or on an
    /// unrecoverable error.
    pub fn run(&mut self) -> Result<(), MonitorError> {
        let outcome = self.run_loop();
        self.transition(MonitorState::Stopped);
        if outcome.is_ok() {
            info!("Monitoring stopped");
        }
        outcome
    }

    fn run_loop(&mut self) -> Result<(), MonitorError> {
        self.initialize()?;
        info!(
            interval_secs = self.config.interval_secs,
            report = %self.audit.path().display(),
            "Monitoring started"
        );

        loop {
            if self.cancel.wait_timeout(self.config.interval()) {
                break;
            }
            self.run_pass()?;
            if self.cancel.is_cancelled() {
                break;
            }
        }

        Ok(())
    }

    fn transition(&mut self, next: MonitorState) {
        trace!(from = ?self.state, to = ?next, "Monitor state transition");
        self.state = next;
    }
}

/// The report path, rejoined onto the configured root, when it resolves
/// inside the monitored tree
///
/// Canonicalizes both sides so relative report paths and symlinked roots
/// compare correctly, then re-expresses the result in the root's configured
/// form so it matches the paths the walker yields exactly.
fn report_path_under_root(config: &MonitorConfig) -> Option<PathBuf> {
    let root = std::fs::canonicalize(&config.root).ok()?;
    let report = std::fs::canonicalize(&config.report_path)
        .ok()
        .or_else(|| {
            let parent = config.report_path.parent()?;
            let parent = if parent.as_os_str().is_empty() {
                std::env::current_dir().ok()?
            } else {
                std::fs::canonicalize(parent).ok()?
            };
            Some(parent.join(config.report_path.file_name()?))
        })?;
    let relative = report.strip_prefix(&root).ok()?;
    Some(config.root.join(relative))
}
