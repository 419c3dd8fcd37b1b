//! Size bucketing: the cheap pre-filter before any content is read.
//!
//! # Overview
//!
//! Bucketing is the second phase of duplicate detection. Every discovered
//! path is grouped by its exact byte size; files with different sizes
//! cannot be duplicates, so any bucket with fewer than two members is
//! dropped before the hashing phase. This typically eliminates the large
//! majority of files without a single content read.
//!
//! # Example
//!
//! ```no_run
//! use dupsweep::duplicates::bucket_by_size;
//! use dupsweep::progress::NullSink;
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("/a.txt"), PathBuf::from("/b.txt")];
//! let (buckets, stats) = bucket_by_size(&paths, &NullSink, None);
//! println!("{} candidate files", stats.candidate_files);
//! # let _ = buckets;
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::progress::{Phase, ProgressEvent, ProgressSink};

/// Sizing progress is reported every this many paths.
const SIZING_EVENT_INTERVAL: u64 = 200;

/// Statistics from the bucketing phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketStats {
    /// Number of paths consumed
    pub total_paths: usize,
    /// Paths excluded because the metadata query failed
    pub stat_failures: usize,
    /// Zero-byte files, excluded unconditionally
    pub empty_files: usize,
    /// Distinct sizes seen among non-empty files
    pub unique_sizes: usize,
    /// Singleton buckets dropped without hashing
    pub eliminated_unique: usize,
    /// Files remaining in buckets of two or more
    pub candidate_files: usize,
    /// Buckets of two or more members
    pub candidate_buckets: usize,
}

impl BucketStats {
    /// Percentage of paths eliminated before hashing.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_paths == 0 {
            0.0
        } else {
            let eliminated = self.total_paths - self.candidate_files;
            (eliminated as f64 / self.total_paths as f64) * 100.0
        }
    }
}

/// Group candidate paths by exact byte size.
///
/// For each path the size is obtained via a metadata query; paths whose
/// query fails (vanished, permission denied) are excluded from every
/// bucket and counted in [`BucketStats::stat_failures`]. Zero-byte files
/// are never candidates for duplication and are excluded unconditionally.
///
/// Buckets are keyed in an ordered map so downstream hashing proceeds in
/// a deterministic size order. Within a bucket, paths keep their
/// discovery order.
///
/// Emits [`Phase::Sizing`] progress events at a fixed cadence; the total
/// is known in this phase. Checks `shutdown` between paths and returns
/// early (with whatever was bucketed so far) when it is set; the caller
/// is responsible for discarding partial results.
#[must_use]
pub fn bucket_by_size(
    paths: &[PathBuf],
    sink: &dyn ProgressSink,
    shutdown: Option<&AtomicBool>,
) -> (BTreeMap<u64, Vec<PathBuf>>, BucketStats) {
    let mut all_buckets: BTreeMap<u64, Vec<PathBuf>> = BTreeMap::new();
    let mut stats = BucketStats {
        total_paths: paths.len(),
        ..Default::default()
    };
    let total = paths.len() as u64;

    for (idx, path) in paths.iter().enumerate() {
        if shutdown.is_some_and(|f| f.load(Ordering::SeqCst)) {
            log::debug!("Bucketing: shutdown requested, stopping");
            break;
        }

        let processed = idx as u64 + 1;
        if processed % SIZING_EVENT_INTERVAL == 0 || processed == total {
            sink.emit(ProgressEvent::new(
                Phase::Sizing,
                processed,
                total,
                format!("{processed}/{total}"),
            ));
        }

        let size = match fs::metadata(path) {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => {
                // Path stopped being a regular file since discovery
                log::debug!("No longer a regular file, skipping: {}", path.display());
                stats.stat_failures += 1;
                continue;
            }
            Err(e) => {
                log::debug!("Metadata query failed for {}: {}", path.display(), e);
                stats.stat_failures += 1;
                continue;
            }
        };

        if size == 0 {
            stats.empty_files += 1;
            continue;
        }

        all_buckets.entry(size).or_default().push(path.clone());
    }

    if stats.empty_files > 0 {
        log::debug!("Excluded {} empty file(s) from bucketing", stats.empty_files);
    }

    stats.unique_sizes = all_buckets.len();

    let buckets: BTreeMap<u64, Vec<PathBuf>> = all_buckets
        .into_iter()
        .filter(|(_, members)| {
            if members.len() < 2 {
                stats.eliminated_unique += 1;
                false
            } else {
                stats.candidate_files += members.len();
                stats.candidate_buckets += 1;
                true
            }
        })
        .collect();

    log::info!(
        "Sizing complete: {} paths -> {} candidates in {} buckets ({:.1}% eliminated)",
        stats.total_paths,
        stats.candidate_files,
        stats.candidate_buckets,
        stats.elimination_rate()
    );

    (buckets, stats)
}
