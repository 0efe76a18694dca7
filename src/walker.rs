//! Filesystem walker for enumerating monitored files

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    pub follow_symlinks: bool,
    /// Directory or file names to ignore (e.g., ".git", "target")
    pub ignore_patterns: Vec<String>,
    /// Exact paths excluded from enumeration (e.g., the audit log itself).
    /// Unlike `ignore_patterns`, these never match same-named entries
    /// elsewhere in the tree.
    pub exclude_paths: Vec<PathBuf>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore_patterns: vec![
                ".git".to_string(),
                "target".to_string(),
                "node_modules".to_string(),
            ],
            exclude_paths: Vec::new(),
        }
    }
}

/// Filesystem walker
///
/// Each call to [`Walker::files`] performs a fresh traversal reflecting the
/// tree's current shape, so the walker can be reused across polling passes.
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// The monitored root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yield the regular files reachable under the root
    ///
    /// Subdirectories are descended recursively; entries matching an ignore
    /// pattern are pruned along with their subtrees. Enumeration failures
    /// (permission denied, directory removed mid-walk) are yielded as errors
    /// so the caller can skip the affected subtree while siblings continue
    /// to be produced.
    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .filter_entry(move |entry| entry.depth() == 0 || !self.should_ignore(entry))
            .filter_map(|entry| match entry {
                Ok(e) if e.file_type().is_file() => Some(Ok(e.into_path())),
                Ok(_) => None,
                Err(err) => Some(Err(err)),
            })
    }

    /// Check if an entry should be ignored based on ignore patterns
    /// or exact path exclusions
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        if self.config.exclude_paths.iter().any(|p| p == entry.path()) {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| name == pattern.as_str())
    }
}
