//! Baseline store and tree sampling
//!
//! The baseline is the last confirmed digest of every monitored file, owned
//! by a single monitoring session and replaced wholesale after each completed
//! comparison pass. A sample is one pass's observation of the tree: the
//! digests that could be computed, plus bookkeeping for paths and subtrees
//! that could not be read so the detector never misreports them as changes.

use crate::hasher::{self, Digest};
use crate::walker::Walker;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Mapping from monitored path to last confirmed content digest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
    entries: HashMap<PathBuf, Digest>,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the initial baseline from the first sample
    ///
    /// Failed-to-sample paths are simply not tracked yet; they enter the
    /// baseline on the first pass that hashes them successfully.
    pub fn from_sample(sample: Sample) -> Self {
        Self {
            entries: sample.digests,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn digest(&self, path: &Path) -> Option<&Digest> {
        self.entries.get(path)
    }

    pub fn insert(&mut self, path: PathBuf, digest: Digest) {
        self.entries.insert(path, digest);
    }

    /// Iterate over tracked paths and their digests
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Digest)> {
        self.entries.iter()
    }
}

/// One polling pass's observation of the monitored tree
#[derive(Debug, Clone, Default)]
pub struct Sample {
    /// Digest of every file that was enumerated and hashed successfully
    pub digests: HashMap<PathBuf, Digest>,
    /// Paths that were enumerated but could not be hashed, and whose
    /// disappearance could not be confirmed. These are skipped for the pass.
    pub failed: HashSet<PathBuf>,
    /// Subtree roots whose enumeration failed outright. Baseline entries
    /// under these roots are not compared this pass.
    pub unreachable: Vec<PathBuf>,
}

/// Enumerate and hash every currently present file under the walker's root
///
/// A file that vanishes between enumeration and hashing is left out of the
/// sample when its absence is confirmed, so the detector classifies it as
/// deleted. A hash failure on a file that still exists (or whose existence
/// cannot be re-checked) marks it failed-to-sample instead, leaving its
/// baseline entry untouched rather than falsely reporting a change.
pub fn sample_tree(walker: &Walker) -> Sample {
    let start = Instant::now();
    let mut sample = Sample::default();

    for entry in walker.files() {
        match entry {
            Ok(path) => match hasher::hash_file(&path) {
                Ok(digest) => {
                    trace!(
                        path = %path.display(),
                        digest = %hasher::digest_hex(&digest),
                        "Hashed file"
                    );
                    sample.digests.insert(path, digest);
                }
                Err(err) => classify_hash_failure(&mut sample, path, &err),
            },
            Err(err) => {
                let subtree = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| walker.root().to_path_buf());
                warn!(
                    subtree = %subtree.display(),
                    "Skipping unreadable subtree: {err}"
                );
                sample.unreachable.push(subtree);
            }
        }
    }

    debug!(
        files = sample.digests.len(),
        failed = sample.failed.len(),
        unreachable = sample.unreachable.len(),
        elapsed = ?start.elapsed(),
        "Sampled monitored tree"
    );
    sample
}

fn classify_hash_failure(sample: &mut Sample, path: PathBuf, err: &std::io::Error) {
    // Re-check existence to distinguish a deletion race from a read failure
    match std::fs::symlink_metadata(&path) {
        Err(ref meta_err) if meta_err.kind() == ErrorKind::NotFound => {
            debug!(
                path = %path.display(),
                "File vanished before hashing, treating as deleted"
            );
        }
        _ => {
            warn!(
                path = %path.display(),
                "Failed to hash file, skipping for this pass: {err}"
            );
            sample.failed.insert(path);
        }
    }
}
