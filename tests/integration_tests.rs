//! End-to-end pipeline tests: scan, resolve, quarantine.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::tempdir;

use dupsweep::actions::quarantine_batch;
use dupsweep::duplicates::{run_scan, spawn_scan, ScanOutcome, ScanUpdate};
use dupsweep::progress::NullSink;
use dupsweep::scanner::WalkerConfig;
use dupsweep::selection::{KeepPolicy, SelectionState};

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

fn set_mtime(path: &Path, unix_secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(unix_secs, 0)).unwrap();
}

fn scan(root: &Path) -> ScanOutcome {
    run_scan(root, WalkerConfig::default(), &NullSink, None).unwrap()
}

#[test]
fn test_hello_world_scenario() {
    // a.txt and b.txt share content "hello"; c.txt is "world" at the
    // same size. Exactly one group {a, b}; c appears nowhere.
    let dir = tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"hello");
    let b = write_file(dir.path(), "b.txt", b"hello");
    let c = write_file(dir.path(), "c.txt", b"world");

    let outcome = scan(dir.path());

    assert_eq!(outcome.collection.len(), 1);
    let group = outcome.collection.groups().next().unwrap();
    assert_eq!(group.paths(), vec![a, b]);
    assert_eq!(group.size, 5);
    assert!(!outcome.collection.contains_path(&c));
}

#[test]
fn test_same_size_different_content() {
    let dir = tempdir().unwrap();
    let mut x = vec![0x55u8; 1024];
    let mut y = x.clone();
    x[1023] = 0x00;
    y[1023] = 0xFF;
    write_file(dir.path(), "x.bin", &x);
    write_file(dir.path(), "y.bin", &y);

    let outcome = scan(dir.path());

    assert!(outcome.collection.is_empty());
}

#[test]
fn test_zero_byte_files_never_grouped() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "empty1.txt", b"");
    write_file(dir.path(), "empty2.txt", b"");
    write_file(dir.path(), "empty3.txt", b"");

    let outcome = scan(dir.path());

    assert!(outcome.collection.is_empty());
    assert_eq!(outcome.stats.bucketing.empty_files, 3);
}

#[test]
fn test_nested_duplicates_found() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("deep").join("deeper");
    fs::create_dir_all(&sub).unwrap();
    write_file(dir.path(), "top.dat", b"payload");
    write_file(&sub, "bottom.dat", b"payload");

    let outcome = scan(dir.path());

    assert_eq!(outcome.collection.len(), 1);
    assert_eq!(outcome.collection.total_files(), 2);
}

#[test]
fn test_excluded_directory_never_contributes() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"twin content");
    let hidden = dir.path().join("skipme");
    fs::create_dir(&hidden).unwrap();
    write_file(&hidden, "b.txt", b"twin content");

    let config = WalkerConfig::with_excluded_dirs(["skipme".to_string()].into_iter().collect());
    let outcome = run_scan(dir.path(), config, &NullSink, None).unwrap();

    // The twin lives in a pruned directory, so no duplicate exists
    assert!(outcome.collection.is_empty());
    assert_eq!(outcome.stats.discovered, 1);
}

#[test]
fn test_rescan_yields_identical_groups() {
    let dir = tempdir().unwrap();
    for i in 0..4 {
        write_file(dir.path(), &format!("copy{i}.bin"), b"identical bytes here");
    }
    write_file(dir.path(), "other.bin", b"something different!");

    let first = scan(dir.path());
    let second = scan(dir.path());

    let groups_of = |outcome: &ScanOutcome| -> Vec<(Vec<PathBuf>, String)> {
        outcome
            .collection
            .groups()
            .map(|g| (g.paths(), g.fingerprint_hex()))
            .collect()
    };
    assert_eq!(groups_of(&first), groups_of(&second));
}

#[test]
fn test_keep_earliest_never_marks_minimum() {
    let dir = tempdir().unwrap();
    let oldest = write_file(dir.path(), "oldest.txt", b"dup");
    let middle = write_file(dir.path(), "middle.txt", b"dup");
    let newest = write_file(dir.path(), "newest.txt", b"dup");
    set_mtime(&oldest, 1_000_000);
    set_mtime(&middle, 2_000_000);
    set_mtime(&newest, 3_000_000);

    let outcome = scan(dir.path());
    let mut selection = SelectionState::new();
    selection.apply_policy_all(&outcome.collection, KeepPolicy::Earliest);

    assert!(!selection.is_marked(&oldest));
    assert!(selection.is_marked(&middle));
    assert!(selection.is_marked(&newest));
}

#[test]
fn test_keep_latest_never_marks_maximum() {
    let dir = tempdir().unwrap();
    let oldest = write_file(dir.path(), "oldest.txt", b"dup");
    let newest = write_file(dir.path(), "newest.txt", b"dup");
    set_mtime(&oldest, 1_000_000);
    set_mtime(&newest, 3_000_000);

    let outcome = scan(dir.path());
    let mut selection = SelectionState::new();
    selection.apply_policy_all(&outcome.collection, KeepPolicy::Latest);

    assert!(!selection.is_marked(&newest));
    assert!(selection.is_marked(&oldest));
}

#[test]
fn test_relocation_removes_member_and_drops_small_groups() {
    let dir = tempdir().unwrap();
    let quarantine_root = tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", b"pair");
    let b = write_file(dir.path(), "b.txt", b"pair");

    let mut outcome = scan(dir.path());
    assert_eq!(outcome.collection.len(), 1);

    let batch = quarantine_batch(std::slice::from_ref(&b), quarantine_root.path()).unwrap();
    assert_eq!(batch.moved_count(), 1);
    for moved in &batch.moved {
        outcome.collection.remove_path(&moved.from);
    }

    // One member left: the group is gone from the collection
    assert!(outcome.collection.is_empty());
    assert!(!outcome.collection.contains_path(&a));
    assert!(a.exists());
    assert!(!b.exists());
}

#[test]
fn test_quarantine_collision_scenario() {
    // Moving report.docx into a destination that already holds a
    // report.docx yields report_dup_0.docx without overwriting.
    let dir = tempdir().unwrap();
    let quarantine_root = tempdir().unwrap();
    let src = write_file(dir.path(), "report.docx", b"new copy");

    let batch = quarantine_batch(std::slice::from_ref(&src), quarantine_root.path()).unwrap();
    let dest_dir = batch.destination.clone();
    assert!(dest_dir
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("Duplicate_Trash_"));

    // A second file with the same base name collides inside that folder
    let src2 = write_file(dir.path(), "report.docx", b"even newer");
    let result = dupsweep::actions::move_to_quarantine(&src2, &dest_dir).unwrap();

    assert_eq!(result.to, dest_dir.join("report_dup_0.docx"));
    assert_eq!(fs::read(dest_dir.join("report.docx")).unwrap(), b"new copy");
    assert_eq!(fs::read(&result.to).unwrap(), b"even newer");
}

#[test]
fn test_full_resolution_flow() {
    // Scan, bulk-mark with keep-earliest, quarantine, verify the
    // collection and the filesystem agree afterwards.
    let dir = tempdir().unwrap();
    let quarantine_root = tempdir().unwrap();

    let keep = write_file(dir.path(), "keep.txt", b"shared-content");
    let lose_a = write_file(dir.path(), "lose_a.txt", b"shared-content");
    let lose_b = write_file(dir.path(), "lose_b.txt", b"shared-content");
    set_mtime(&keep, 1_000_000);
    set_mtime(&lose_a, 2_000_000);
    set_mtime(&lose_b, 3_000_000);

    let mut outcome = scan(dir.path());
    let mut selection = SelectionState::new();
    selection.apply_policy_all(&outcome.collection, KeepPolicy::Earliest);
    assert_eq!(selection.len(), 2);

    let batch = quarantine_batch(&selection.marked_paths(), quarantine_root.path()).unwrap();
    assert_eq!(batch.moved_count(), 2);
    assert_eq!(batch.failure_count(), 0);

    for moved in &batch.moved {
        outcome.collection.remove_path(&moved.from);
    }
    selection.retain_in(&outcome.collection);

    assert!(outcome.collection.is_empty());
    assert!(selection.is_empty());
    assert!(keep.exists());
    assert!(!lose_a.exists());
    assert!(!lose_b.exists());
    assert_eq!(fs::read_dir(&batch.destination).unwrap().count(), 2);
}

#[test]
fn test_background_scan_channel_contract() {
    let dir = tempdir().unwrap();
    for i in 0..150 {
        write_file(dir.path(), &format!("file{i:03}.txt"), b"spread");
    }

    let (worker, updates) = spawn_scan(dir.path().to_path_buf(), WalkerConfig::default(), None);

    let mut saw_progress = false;
    let mut finished = None;
    for update in updates.iter() {
        match update {
            ScanUpdate::Progress(event) => {
                assert!(finished.is_none(), "progress delivered after completion");
                saw_progress = true;
                let _ = event;
            }
            ScanUpdate::Finished(result) => finished = Some(result),
        }
    }
    worker.join().unwrap();

    assert!(saw_progress);
    let outcome = finished.expect("scan must complete").unwrap();
    assert_eq!(outcome.stats.discovered, 150);
    assert_eq!(outcome.collection.len(), 1);
    assert_eq!(outcome.collection.total_files(), 150);
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"readable pair");
    write_file(dir.path(), "b.txt", b"readable pair");

    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write_file(&locked, "hidden.txt", b"readable pair");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Root ignores directory permissions; nothing to verify in that case
    let actually_locked = fs::read_dir(&locked).is_err();

    let outcome = scan(dir.path());

    // Restore permissions so the tempdir can be cleaned up
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    // The scan survives and still pairs the readable files
    assert_eq!(outcome.collection.len(), 1);
    if actually_locked {
        assert_eq!(outcome.collection.total_files(), 2);
    }
}
