//! Directory walker for candidate file discovery.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and yielding candidate file paths for duplicate detection.
//!
//! # Behavior
//!
//! - Recursive descent from a single root
//! - Subdirectories whose *name* matches the exclusion set are pruned
//!   before descent: never visited, never reported
//! - Directory entries are visited in sorted order so a fixed filesystem
//!   state always yields the same traversal
//! - Unreadable directories are skipped (logged, never fatal)
//! - Graceful shutdown via atomic flag, checked between entries
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().collect();
//! println!("Found {} files", files.len());
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::WalkerConfig;

/// Baseline exclusion set: the platform system folders the original
/// cleanup tool refused to descend into.
#[must_use]
pub fn default_excluded_dirs() -> BTreeSet<String> {
    ["$RECYCLE.BIN", "System Volume Information", "Windows"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Directory walker for sequential file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given root.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops iteration at the
    /// next entry boundary.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check whether a directory entry should be pruned.
    ///
    /// Only the final path component is compared against the exclusion
    /// set; the root itself is never pruned.
    fn is_excluded_dir(&self, entry: &walkdir::DirEntry) -> bool {
        if !entry.file_type().is_dir() || entry.path() == self.root {
            return false;
        }
        entry
            .file_name()
            .to_str()
            .is_some_and(|name| self.config.excluded_dirs.contains(name))
    }

    /// Walk the directory tree, yielding candidate file paths lazily.
    ///
    /// Only regular files are yielded; symlinks are not followed. Errors
    /// (typically unreadable directories) are logged and skipped rather
    /// than aborting the traversal.
    pub fn walk(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded_dir(entry))
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| {
                match entry_result {
                    Ok(entry) => {
                        if entry.file_type().is_file() {
                            Some(entry.into_path())
                        } else {
                            None
                        }
                    }
                    Err(e) => {
                        let path = e
                            .path()
                            .map_or_else(|| self.root.clone(), Path::to_path_buf);
                        log::warn!("Skipping unreadable entry {}: {}", path.display(), e);
                        None
                    }
                }
            })
    }
}
