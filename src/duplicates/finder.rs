//! Duplicate grouping and the scan pipeline.
//!
//! # Overview
//!
//! This module orchestrates the full detection pipeline:
//! 1. **Discovery**: walk the tree, collect candidate paths
//! 2. **Sizing**: bucket paths by exact byte size, drop singletons
//! 3. **Hashing/grouping**: fingerprint every bucket member, group by
//!    fingerprint within the bucket, keep groups of two or more
//!
//! Fingerprints are never compared across buckets: a size mismatch
//! already proves non-duplication, so each bucket is grouped in
//! isolation.
//!
//! All phases run sequentially on whichever thread calls [`run_scan`].
//! [`spawn_scan`] moves the whole pipeline onto a background worker and
//! returns a channel that carries progress events in order, followed by
//! a single completion message with the finished, immutable
//! [`DuplicateCollection`].
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::run_scan;
//! use dupsweep::progress::NullSink;
//! use dupsweep::scanner::WalkerConfig;
//! use std::path::Path;
//!
//! let outcome = run_scan(Path::new("."), WalkerConfig::default(), &NullSink, None).unwrap();
//! if outcome.collection.is_empty() {
//!     println!("No duplicates found.");
//! } else {
//!     println!("{} duplicate group(s)", outcome.collection.len());
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime};

use crate::progress::{truncate_label, Phase, ProgressEvent, ProgressSink};
use crate::scanner::{FileRecord, Fingerprint, Hasher, ScanError, Walker, WalkerConfig};

use super::buckets::{bucket_by_size, BucketStats};
use super::groups::{DuplicateCollection, DuplicateGroup};

/// Discovery progress is reported every this many files.
const DISCOVERY_EVENT_INTERVAL: u64 = 100;

/// Progress labels show at most this many characters of a file name.
const LABEL_WIDTH: usize = 30;

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by a shutdown signal.
    #[error("scan interrupted")]
    Interrupted,

    /// The scan root could not be used.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Statistics from the hashing/grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrouperStats {
    /// Files that entered the hashing phase
    pub candidates: usize,
    /// Files fingerprinted successfully
    pub hashed: usize,
    /// Files excluded because the content read failed
    pub unhashable: usize,
    /// Duplicate groups found
    pub groups: usize,
    /// Files across all duplicate groups
    pub duplicate_files: usize,
}

/// Combined statistics for one full scan.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Files discovered by traversal
    pub discovered: usize,
    /// Bucketing phase statistics
    pub bucketing: BucketStats,
    /// Hashing/grouping phase statistics
    pub grouping: GrouperStats,
    /// Wall-clock duration of the whole pipeline
    pub elapsed: Duration,
}

impl ScanStats {
    /// Whether any non-fatal error excluded files from the scan.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.bucketing.stat_failures > 0 || self.grouping.unhashable > 0
    }

    /// Number of files excluded by non-fatal errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.bucketing.stat_failures + self.grouping.unhashable
    }
}

/// The result of one complete scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Root directory that was scanned
    pub root: PathBuf,
    /// Duplicate groups, keyed by fingerprint
    pub collection: DuplicateCollection,
    /// Pipeline statistics
    pub stats: ScanStats,
}

/// Message on the scan channel: ordered progress, then one completion.
#[derive(Debug)]
pub enum ScanUpdate {
    /// A progress notification, delivered in generation order.
    Progress(ProgressEvent),
    /// Final message: the completed scan, or the error that aborted it.
    Finished(Result<ScanOutcome, FinderError>),
}

impl ProgressSink for Sender<ScanUpdate> {
    fn emit(&self, event: ProgressEvent) {
        // A consumer that has gone away must not abort the scan
        let _ = self.send(ScanUpdate::Progress(event));
    }
}

/// Run the full scan pipeline on the current thread.
///
/// Phases execute sequentially; `sink` receives progress events in
/// order. The `shutdown` flag is checked between discrete units of work
/// (per file, per phase), never inside a single hash computation.
///
/// # Errors
///
/// Returns [`FinderError::Scan`] if the root does not exist or is not a
/// directory, and [`FinderError::Interrupted`] if the shutdown flag was
/// set before the pipeline completed. Per-file failures (unreadable
/// directories, vanished files, unhashable content) are never fatal;
/// they are counted in [`ScanStats`].
pub fn run_scan(
    root: &Path,
    config: WalkerConfig,
    sink: &dyn ProgressSink,
    shutdown: Option<Arc<AtomicBool>>,
) -> Result<ScanOutcome, FinderError> {
    let started = Instant::now();
    validate_root(root)?;

    let is_shutdown = |flag: &Option<Arc<AtomicBool>>| {
        flag.as_ref().is_some_and(|f| f.load(Ordering::SeqCst))
    };

    // Phase 1: discovery (count-only progress, no total known)
    let mut walker = Walker::new(root, config);
    if let Some(ref flag) = shutdown {
        walker = walker.with_shutdown_flag(Arc::clone(flag));
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for path in walker.walk() {
        paths.push(path);
        let count = paths.len() as u64;
        if count % DISCOVERY_EVENT_INTERVAL == 0 {
            sink.emit(ProgressEvent::new(
                Phase::Discovering,
                count,
                0,
                format!("{count} files"),
            ));
        }
    }
    sink.emit(ProgressEvent::new(
        Phase::Discovering,
        paths.len() as u64,
        0,
        format!("{} files", paths.len()),
    ));
    if is_shutdown(&shutdown) {
        return Err(FinderError::Interrupted);
    }
    log::info!("Discovery complete: {} file(s) under {}", paths.len(), root.display());

    // Phase 2: size bucketing
    let (buckets, bucket_stats) = bucket_by_size(&paths, sink, shutdown.as_deref());
    if is_shutdown(&shutdown) {
        return Err(FinderError::Interrupted);
    }

    // Phase 3: hashing and grouping
    let (collection, grouper_stats) =
        group_by_content(&buckets, &Hasher::new(), sink, shutdown.as_deref());
    if is_shutdown(&shutdown) {
        return Err(FinderError::Interrupted);
    }

    let stats = ScanStats {
        discovered: paths.len(),
        bucketing: bucket_stats,
        grouping: grouper_stats,
        elapsed: started.elapsed(),
    };

    log::info!(
        "Scan complete: {} duplicate group(s), {} file(s), {} excluded by errors",
        collection.len(),
        collection.total_files(),
        stats.error_count()
    );

    Ok(ScanOutcome {
        root: root.to_path_buf(),
        collection,
        stats,
    })
}

/// Group same-sized files by content fingerprint.
///
/// For each bucket, every member is fingerprinted and members are
/// grouped by fingerprint *within that bucket only*. Groups with two or
/// more successfully hashed members become [`DuplicateGroup`]s; a
/// member whose content read fails is excluded from its group and
/// counted, never treated as a duplicate or a fatal error.
///
/// Per-member last-modified timestamps are captured at hashing time
/// into the resulting [`FileRecord`]s.
///
/// Emits a [`Phase::Hashing`] event per file; the total is known in
/// this phase, so consumers can show a determinate indicator.
#[must_use]
pub fn group_by_content(
    buckets: &BTreeMap<u64, Vec<PathBuf>>,
    hasher: &Hasher,
    sink: &dyn ProgressSink,
    shutdown: Option<&AtomicBool>,
) -> (DuplicateCollection, GrouperStats) {
    let total: usize = buckets.values().map(Vec::len).sum();
    let mut stats = GrouperStats {
        candidates: total,
        ..Default::default()
    };
    let mut collection = DuplicateCollection::new();
    let mut processed = 0u64;

    for (&size, members) in buckets {
        let mut by_fingerprint: BTreeMap<Fingerprint, Vec<PathBuf>> = BTreeMap::new();

        for path in members {
            if shutdown.is_some_and(|f| f.load(Ordering::SeqCst)) {
                log::debug!("Grouper: shutdown requested, stopping");
                return (collection, stats);
            }

            processed += 1;
            let display_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            sink.emit(ProgressEvent::new(
                Phase::Hashing,
                processed,
                total as u64,
                truncate_label(&display_name, LABEL_WIDTH),
            ));

            match hasher.hash_file(path) {
                Ok(fingerprint) => {
                    stats.hashed += 1;
                    by_fingerprint.entry(fingerprint).or_default().push(path.clone());
                }
                Err(e) => {
                    stats.unhashable += 1;
                    log::warn!("Unhashable, excluded from grouping: {}", e);
                }
            }
        }

        for (fingerprint, paths) in by_fingerprint {
            if paths.len() < 2 {
                continue;
            }
            let records = paths
                .into_iter()
                .map(|path| {
                    let modified = modified_at_hash_time(&path);
                    FileRecord::new(path, size, modified)
                })
                .collect();
            let group = DuplicateGroup::new(fingerprint, size, records);
            stats.groups += 1;
            stats.duplicate_files += group.len();
            collection.insert(group);
        }
    }

    (collection, stats)
}

/// Spawn the scan pipeline on a background worker thread.
///
/// Returns the worker handle and the receiving end of the scan channel.
/// The channel delivers [`ScanUpdate::Progress`] messages in generation
/// order and exactly one [`ScanUpdate::Finished`] after all phases
/// complete; the completed collection is handed off atomically inside
/// that final message.
#[must_use]
pub fn spawn_scan(
    root: PathBuf,
    config: WalkerConfig,
    shutdown: Option<Arc<AtomicBool>>,
) -> (JoinHandle<()>, Receiver<ScanUpdate>) {
    let (tx, rx) = mpsc::channel::<ScanUpdate>();

    let handle = thread::spawn(move || {
        let result = run_scan(&root, config, &tx, shutdown);
        // If the consumer is gone there is nobody left to notify
        let _ = tx.send(ScanUpdate::Finished(result));
    });

    (handle, rx)
}

fn validate_root(root: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Stat the file's mtime at hashing time.
///
/// The file was readable a moment ago (it was just hashed); if it has
/// vanished since, the record keeps the epoch as its timestamp, the
/// same snapshot-staleness the rest of the pipeline accepts.
fn modified_at_hash_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}
