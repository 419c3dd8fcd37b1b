//! Selection state and keep policies for duplicate resolution.
//!
//! # Overview
//!
//! [`SelectionState`] tracks which files are marked for relocation. It is
//! keyed by stable file identity (the path), not by any presentation
//! widget, so the mapping survives re-rendering and is testable without a
//! UI. A selection is valid only against the collection it was built for;
//! it is replaced together with the collection on every new scan.
//!
//! # Keep policies
//!
//! [`KeepPolicy::Earliest`] marks every member of a group except the one
//! with the minimum last-modified timestamp; [`KeepPolicy::Latest`] keeps
//! the maximum instead. When several members share the extreme
//! timestamp, the one that appears first in group order is kept; group
//! order is sorted by path, so the tie-break is deterministic and does
//! not depend on traversal order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::duplicates::{DuplicateCollection, DuplicateGroup};

/// Which member of a duplicate group to keep when bulk-marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepPolicy {
    /// Keep the member with the earliest last-modified timestamp.
    Earliest,
    /// Keep the member with the latest last-modified timestamp.
    Latest,
}

impl KeepPolicy {
    /// Index of the member this policy keeps.
    ///
    /// Returns `None` for an empty member list. Ties resolve to the
    /// first member in group order.
    #[must_use]
    pub fn kept_index(self, group: &DuplicateGroup) -> Option<usize> {
        let members = group.members();
        let first = members.first()?;
        let mut kept = 0usize;
        let mut extreme = first.modified;

        for (idx, member) in members.iter().enumerate().skip(1) {
            let better = match self {
                Self::Earliest => member.modified < extreme,
                Self::Latest => member.modified > extreme,
            };
            if better {
                kept = idx;
                extreme = member.modified;
            }
        }
        Some(kept)
    }
}

/// Paths currently marked for relocation.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    marked: HashSet<PathBuf>,
}

impl SelectionState {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one member's flag; siblings are never affected.
    ///
    /// Returns the new state of the flag.
    pub fn toggle(&mut self, path: &Path) -> bool {
        if self.marked.remove(path) {
            false
        } else {
            self.marked.insert(path.to_path_buf());
            true
        }
    }

    /// Mark a path.
    pub fn mark(&mut self, path: &Path) {
        self.marked.insert(path.to_path_buf());
    }

    /// Unmark a path.
    pub fn unmark(&mut self, path: &Path) {
        self.marked.remove(path);
    }

    /// Whether a path is marked.
    #[must_use]
    pub fn is_marked(&self, path: &Path) -> bool {
        self.marked.contains(path)
    }

    /// Number of marked paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.marked.len()
    }

    /// Whether nothing is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Remove all marks.
    pub fn clear(&mut self) {
        self.marked.clear();
    }

    /// Marked paths in sorted order.
    #[must_use]
    pub fn marked_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.marked.iter().cloned().collect();
        paths.sort();
        paths
    }

    /// Apply a keep policy to one group: mark every member except the
    /// kept one, unmark the kept one.
    pub fn apply_policy(&mut self, group: &DuplicateGroup, policy: KeepPolicy) {
        let Some(kept) = policy.kept_index(group) else {
            return;
        };
        for (idx, member) in group.members().iter().enumerate() {
            if idx == kept {
                self.unmark(&member.path);
            } else {
                self.mark(&member.path);
            }
        }
    }

    /// Apply a keep policy to every group in the collection.
    pub fn apply_policy_all(&mut self, collection: &DuplicateCollection, policy: KeepPolicy) {
        for group in collection.groups() {
            self.apply_policy(group, policy);
        }
    }

    /// Drop marks for paths no longer present in the collection.
    ///
    /// Called after relocation removes members, so the selection never
    /// refers outside the current collection.
    pub fn retain_in(&mut self, collection: &DuplicateCollection) {
        self.marked.retain(|path| collection.contains_path(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileRecord;
    use std::time::{Duration, SystemTime};

    fn record_at(path: &str, secs: u64) -> FileRecord {
        FileRecord::new(
            PathBuf::from(path),
            10,
            SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        )
    }

    fn group(records: Vec<FileRecord>) -> DuplicateGroup {
        DuplicateGroup::new([7u8; 32], 10, records)
    }

    #[test]
    fn test_toggle_flips_only_addressed_member() {
        let mut selection = SelectionState::new();

        assert!(selection.toggle(Path::new("/a")));
        assert!(selection.is_marked(Path::new("/a")));
        assert!(!selection.is_marked(Path::new("/b")));

        assert!(!selection.toggle(Path::new("/a")));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_keep_earliest_spares_minimum_timestamp() {
        // Group order is path-sorted: /a (20s), /b (10s), /c (30s)
        let g = group(vec![
            record_at("/a", 20),
            record_at("/b", 10),
            record_at("/c", 30),
        ]);

        let mut selection = SelectionState::new();
        selection.apply_policy(&g, KeepPolicy::Earliest);

        assert!(!selection.is_marked(Path::new("/b")));
        assert!(selection.is_marked(Path::new("/a")));
        assert!(selection.is_marked(Path::new("/c")));
    }

    #[test]
    fn test_keep_latest_spares_maximum_timestamp() {
        let g = group(vec![
            record_at("/a", 20),
            record_at("/b", 10),
            record_at("/c", 30),
        ]);

        let mut selection = SelectionState::new();
        selection.apply_policy(&g, KeepPolicy::Latest);

        assert!(!selection.is_marked(Path::new("/c")));
        assert!(selection.is_marked(Path::new("/a")));
        assert!(selection.is_marked(Path::new("/b")));
    }

    #[test]
    fn test_tie_break_keeps_first_in_group_order() {
        // /a and /b share the extreme timestamp; /a sorts first
        let g = group(vec![
            record_at("/b", 10),
            record_at("/a", 10),
            record_at("/c", 30),
        ]);

        let mut selection = SelectionState::new();
        selection.apply_policy(&g, KeepPolicy::Earliest);

        assert!(!selection.is_marked(Path::new("/a")));
        assert!(selection.is_marked(Path::new("/b")));
        assert!(selection.is_marked(Path::new("/c")));
    }

    #[test]
    fn test_apply_policy_unmarks_previously_marked_keeper() {
        let g = group(vec![record_at("/a", 10), record_at("/b", 20)]);

        let mut selection = SelectionState::new();
        selection.mark(Path::new("/a"));
        selection.apply_policy(&g, KeepPolicy::Earliest);

        // /a is the keeper and must be unmarked even though it was
        // manually marked before
        assert!(!selection.is_marked(Path::new("/a")));
        assert!(selection.is_marked(Path::new("/b")));
    }

    #[test]
    fn test_apply_policy_all_covers_every_group() {
        let mut collection = DuplicateCollection::new();
        let mut fp_a = [0u8; 32];
        fp_a[0] = 1;
        let mut fp_b = [0u8; 32];
        fp_b[0] = 2;
        collection.insert(DuplicateGroup::new(
            fp_a,
            10,
            vec![record_at("/g1/a", 10), record_at("/g1/b", 20)],
        ));
        collection.insert(DuplicateGroup::new(
            fp_b,
            10,
            vec![record_at("/g2/a", 5), record_at("/g2/b", 50)],
        ));

        let mut selection = SelectionState::new();
        selection.apply_policy_all(&collection, KeepPolicy::Latest);

        assert_eq!(selection.len(), 2);
        assert!(selection.is_marked(Path::new("/g1/a")));
        assert!(selection.is_marked(Path::new("/g2/a")));
    }

    #[test]
    fn test_retain_in_drops_stale_marks() {
        let mut collection = DuplicateCollection::new();
        collection.insert(group(vec![record_at("/a", 1), record_at("/b", 2)]));

        let mut selection = SelectionState::new();
        selection.mark(Path::new("/a"));
        selection.mark(Path::new("/relocated"));

        selection.retain_in(&collection);

        assert!(selection.is_marked(Path::new("/a")));
        assert!(!selection.is_marked(Path::new("/relocated")));
    }

    #[test]
    fn test_marked_paths_sorted() {
        let mut selection = SelectionState::new();
        selection.mark(Path::new("/z"));
        selection.mark(Path::new("/a"));

        assert_eq!(
            selection.marked_paths(),
            vec![PathBuf::from("/a"), PathBuf::from("/z")]
        );
    }
}
