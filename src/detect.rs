//! Change detection between the baseline and a fresh sample

use crate::baseline::{Baseline, Sample};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

/// Kind of change detected for a monitored path
///
/// The lowercase literals are written into the audit log and consumed by
/// downstream tooling, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// A single detected change, immutable once produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub timestamp: DateTime<Local>,
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Human-readable alert line, printed once per event
    pub fn alert_line(&self) -> String {
        format!("ALERT: {} has been {}!", self.path.display(), self.kind)
    }
}

/// Compare a fresh sample against the baseline
///
/// Returns the detected events, ordered by path for stable output, together
/// with the baseline to install for the next pass. Pure given its inputs:
/// the caller supplies the event timestamp.
///
/// Classification:
/// - present in the sample, absent from the baseline: `added`
/// - present in both with differing digests: `modified`
/// - absent from the sample, present in the baseline: `deleted`, unless the
///   path failed to sample or sits under an unreachable subtree, in which
///   case its baseline entry is carried forward untouched and no event is
///   produced
pub fn diff(
    baseline: &Baseline,
    sample: &Sample,
    timestamp: DateTime<Local>,
) -> (Vec<ChangeEvent>, Baseline) {
    let mut events = Vec::new();
    let mut next = Baseline::new();

    for (path, digest) in &sample.digests {
        match baseline.digest(path) {
            None => events.push(ChangeEvent {
                timestamp,
                path: path.clone(),
                kind: ChangeKind::Added,
            }),
            Some(previous) if previous != digest => events.push(ChangeEvent {
                timestamp,
                path: path.clone(),
                kind: ChangeKind::Modified,
            }),
            Some(_) => {}
        }
        next.insert(path.clone(), *digest);
    }

    for (path, digest) in baseline.iter() {
        if sample.digests.contains_key(path) {
            continue;
        }
        if sample.failed.contains(path)
            || sample.unreachable.iter().any(|root| path.starts_with(root))
        {
            // Could not observe this path this pass; keep the last known state
            next.insert(path.clone(), *digest);
            continue;
        }
        events.push(ChangeEvent {
            timestamp,
            path: path.clone(),
            kind: ChangeKind::Deleted,
        });
    }

    events.sort_by(|a, b| a.path.cmp(&b.path));
    (events, next)
}
