//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking with directory-name exclusions
//! - Content fingerprinting with BLAKE3 (streaming)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`hasher`]: BLAKE3 file fingerprinting (streaming, bounded memory)
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! for path in walker.walk() {
//!     println!("{}", path.display());
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::SystemTime;

// Re-export main types
pub use hasher::{fingerprint_to_hex, Fingerprint, Hasher, BLOCK_SIZE};
pub use walker::{default_excluded_dirs, Walker};

/// Immutable descriptor of one file at scan time.
///
/// A `FileRecord` is a snapshot: it is created when a duplicate group is
/// built and never updated afterward. If the underlying file changes, the
/// record is simply stale; a new scan produces a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time, captured at hashing time
    pub modified: SystemTime,
    /// Base filename for display
    pub display_name: String,
}

impl FileRecord {
    /// Create a new record; the display name is derived from the path.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path,
            size,
            modified,
            display_name,
        }
    }

    /// Modification time formatted for display (`YYYY-MM-DD HH:MM`).
    #[must_use]
    pub fn modified_display(&self) -> String {
        let dt: chrono::DateTime<chrono::Local> = self.modified.into();
        dt.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Directory names pruned before descent (never visited, never reported).
    pub excluded_dirs: BTreeSet<String>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: default_excluded_dirs(),
        }
    }
}

impl WalkerConfig {
    /// Create a configuration with an explicit exclusion set.
    #[must_use]
    pub fn with_excluded_dirs(excluded_dirs: BTreeSet<String>) -> Self {
        Self { excluded_dirs }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The scan root was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The scan root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while fingerprinting a file.
///
/// A file that produces one of these is "unhashable": it is excluded from
/// its candidate group and counted, never treated as a fatal scan error.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file was not found (removed mid-scan).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
