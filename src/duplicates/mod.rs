//! Duplicate detection: size bucketing, content grouping, collections.

pub mod buckets;
pub mod finder;
pub mod groups;

pub use buckets::{bucket_by_size, BucketStats};
pub use finder::{
    group_by_content, run_scan, spawn_scan, FinderError, GrouperStats, ScanOutcome, ScanStats,
    ScanUpdate,
};
pub use groups::{DuplicateCollection, DuplicateGroup};
