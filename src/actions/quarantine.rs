//! Quarantine relocation: move duplicates aside instead of deleting.
//!
//! # Overview
//!
//! Relocation is the only destructive-looking operation in the
//! application, and it is not destructive: marked files are moved into a
//! freshly created, timestamp-named folder where they can be inspected
//! and recovered manually.
//!
//! # Behavior
//!
//! - The destination folder is `Duplicate_Trash_<YYYYMMDD_HHMMSS>`,
//!   created under the configured quarantine root at the moment the
//!   batch starts. Failure to create it aborts the whole batch: there is
//!   nowhere to move files to.
//! - Each file keeps its base name; on a name collision inside the
//!   destination the name becomes `<basename>_dup_<n><ext>` with the
//!   first free `n` starting at 0.
//! - Each move is attempted independently. One locked or vanished file
//!   does not stop the rest; failures are collected and reported as an
//!   aggregate count.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::actions::quarantine_batch;
//! use std::path::{Path, PathBuf};
//!
//! let marked = vec![PathBuf::from("/data/copy_of_report.docx")];
//! let result = quarantine_batch(&marked, Path::new("/home/user/Desktop")).unwrap();
//! println!("{}", result.summary());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

/// Error type for quarantine operations.
#[derive(Debug, Error)]
pub enum QuarantineError {
    /// No quarantine root could be determined for this platform.
    #[error("no quarantine destination available: neither a desktop nor a home directory was found")]
    NoDestinationRoot,

    /// The quarantine folder could not be created. Fatal for the batch.
    #[error("failed to create quarantine folder {path}: {source}")]
    CreateFailed {
        /// Folder that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The source file was not found (moved or deleted since the scan).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied while moving a file.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// General I/O error for one file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// A successfully relocated file.
#[derive(Debug, Clone)]
pub struct MoveResult {
    /// Original location
    pub from: PathBuf,
    /// Location inside the quarantine folder
    pub to: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// Outcome of one relocation batch.
#[derive(Debug, Clone)]
pub struct BatchMoveResult {
    /// The quarantine folder created for this batch
    pub destination: PathBuf,
    /// Successfully relocated files
    pub moved: Vec<MoveResult>,
    /// Failed relocations with their error messages
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchMoveResult {
    /// Number of files relocated.
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }

    /// Number of files that could not be relocated.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Total bytes relocated.
    #[must_use]
    pub fn bytes_moved(&self) -> u64 {
        self.moved.iter().map(|m| m.size).sum()
    }

    /// Whether every move succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary, including the aggregate failure count.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_succeeded() {
            format!(
                "Moved {} file(s) to {}",
                self.moved_count(),
                self.destination.display()
            )
        } else {
            format!(
                "Moved {} file(s) to {}; {} move(s) failed (files may be in use)",
                self.moved_count(),
                self.destination.display(),
                self.failure_count()
            )
        }
    }
}

/// Default quarantine root: the user's desktop, falling back to the
/// home directory.
#[must_use]
pub fn default_quarantine_root() -> Option<PathBuf> {
    let dirs = directories::UserDirs::new()?;
    if let Some(desktop) = dirs.desktop_dir() {
        return Some(desktop.to_path_buf());
    }
    Some(dirs.home_dir().to_path_buf())
}

/// Folder name for a batch started at `when`.
#[must_use]
pub fn quarantine_folder_name(when: DateTime<Local>) -> String {
    format!("Duplicate_Trash_{}", when.format("%Y%m%d_%H%M%S"))
}

/// Create the timestamped quarantine folder under `root`.
///
/// # Errors
///
/// Returns [`QuarantineError::CreateFailed`] if the folder cannot be
/// created; the caller must abort the batch in that case.
pub fn create_quarantine_dir(root: &Path) -> Result<PathBuf, QuarantineError> {
    let dir = root.join(quarantine_folder_name(Local::now()));
    fs::create_dir_all(&dir).map_err(|e| QuarantineError::CreateFailed {
        path: dir.clone(),
        source: e,
    })?;
    log::info!("Created quarantine folder {}", dir.display());
    Ok(dir)
}

/// Pick a destination path inside `dest_dir` for `file_name`,
/// disambiguating collisions as `<basename>_dup_<n><ext>`.
fn resolve_destination(dest_dir: &Path, file_name: &str) -> PathBuf {
    let plain = dest_dir.join(file_name);
    if !plain.exists() {
        return plain;
    }

    let original = Path::new(file_name);
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let ext = original
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 0u32;
    loop {
        let candidate = dest_dir.join(format!("{stem}_dup_{n}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Relocate one file into the quarantine folder.
///
/// Uses `rename` where possible; when the quarantine folder is on a
/// different filesystem the move falls back to copy-then-remove.
///
/// # Errors
///
/// Returns a per-file [`QuarantineError`]; the caller records it and
/// continues with the rest of the batch.
pub fn move_to_quarantine(src: &Path, dest_dir: &Path) -> Result<MoveResult, QuarantineError> {
    let metadata = fs::metadata(src).map_err(|e| map_io_error(src, e))?;
    let size = metadata.len();

    let file_name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| QuarantineError::NotFound(src.to_path_buf()))?;
    let dest = resolve_destination(dest_dir, &file_name);

    if let Err(rename_err) = fs::rename(src, &dest) {
        // Cross-device moves cannot rename; copy and remove instead
        log::debug!(
            "rename failed for {} ({}), falling back to copy",
            src.display(),
            rename_err
        );
        fs::copy(src, &dest).map_err(|e| map_io_error(src, e))?;
        if let Err(e) = fs::remove_file(src) {
            // Do not leave two live copies behind
            let _ = fs::remove_file(&dest);
            return Err(map_io_error(src, e));
        }
    }

    log::info!("Quarantined {} -> {}", src.display(), dest.display());

    Ok(MoveResult {
        from: src.to_path_buf(),
        to: dest,
        size,
    })
}

/// Relocate a batch of marked files into a fresh quarantine folder.
///
/// The folder is created first; if that fails the whole batch is
/// aborted. Every file is then moved independently and failures are
/// collected rather than propagated.
///
/// # Errors
///
/// Only [`QuarantineError::CreateFailed`] is returned; per-file
/// failures end up in [`BatchMoveResult::failures`].
pub fn quarantine_batch(
    marked: &[PathBuf],
    root: &Path,
) -> Result<BatchMoveResult, QuarantineError> {
    let destination = create_quarantine_dir(root)?;

    let mut result = BatchMoveResult {
        destination: destination.clone(),
        moved: Vec::new(),
        failures: Vec::new(),
    };

    for path in marked {
        match move_to_quarantine(path, &destination) {
            Ok(moved) => result.moved.push(moved),
            Err(e) => {
                log::warn!("Failed to quarantine {}: {}", path.display(), e);
                result.failures.push((path.clone(), e.to_string()));
            }
        }
    }

    log::info!("{}", result.summary());
    Ok(result)
}

fn map_io_error(path: &Path, error: io::Error) -> QuarantineError {
    match error.kind() {
        io::ErrorKind::NotFound => QuarantineError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => QuarantineError::PermissionDenied(path.to_path_buf()),
        _ => QuarantineError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
