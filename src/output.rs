//! Scan result rendering for non-interactive output modes.

use bytesize::ByteSize;
use chrono::{DateTime, Local};
use serde_json::json;

use crate::duplicates::ScanOutcome;

/// Render a scan outcome as a plain-text listing.
#[must_use]
pub fn render_list(outcome: &ScanOutcome) -> String {
    let mut out = String::new();

    if outcome.collection.is_empty() {
        out.push_str(&format!(
            "No duplicates found under {} ({} file(s) scanned).\n",
            outcome.root.display(),
            outcome.stats.discovered
        ));
    } else {
        out.push_str(&format!(
            "Found {} duplicate group(s) under {} ({} file(s) scanned, {} reclaimable)\n",
            outcome.collection.len(),
            outcome.root.display(),
            outcome.stats.discovered,
            ByteSize::b(outcome.collection.wasted_bytes())
        ));

        for (idx, group) in outcome.collection.groups().enumerate() {
            out.push_str(&format!(
                "\ngroup {}: {} files x {}  [{}]\n",
                idx + 1,
                group.len(),
                ByteSize::b(group.size),
                &group.fingerprint_hex()[..12]
            ));
            for member in group.members() {
                out.push_str(&format!(
                    "  {}  {}\n",
                    member.modified_display(),
                    member.path.display()
                ));
            }
        }
    }

    if outcome.stats.has_errors() {
        out.push_str(&format!(
            "\n{} file(s) excluded due to read errors.\n",
            outcome.stats.error_count()
        ));
    }

    out
}

/// Render a scan outcome as JSON.
#[must_use]
pub fn render_json(outcome: &ScanOutcome) -> serde_json::Value {
    let groups: Vec<serde_json::Value> = outcome
        .collection
        .groups()
        .map(|group| {
            let files: Vec<serde_json::Value> = group
                .members()
                .iter()
                .map(|member| {
                    let modified: DateTime<Local> = member.modified.into();
                    json!({
                        "path": member.path,
                        "name": member.display_name,
                        "size": member.size,
                        "modified": modified.to_rfc3339(),
                    })
                })
                .collect();
            json!({
                "fingerprint": group.fingerprint_hex(),
                "size": group.size,
                "wasted_bytes": group.wasted_bytes(),
                "files": files,
            })
        })
        .collect();

    json!({
        "root": outcome.root,
        "stats": {
            "discovered": outcome.stats.discovered,
            "candidates": outcome.stats.grouping.candidates,
            "hashed": outcome.stats.grouping.hashed,
            "unhashable": outcome.stats.grouping.unhashable,
            "stat_failures": outcome.stats.bucketing.stat_failures,
            "empty_files": outcome.stats.bucketing.empty_files,
            "elapsed_ms": outcome.stats.elapsed.as_millis() as u64,
        },
        "groups": groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::run_scan;
    use crate::progress::NullSink;
    use crate::scanner::WalkerConfig;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn scan_fixture() -> (TempDir, ScanOutcome) {
        let dir = TempDir::new().unwrap();
        for name in ["a.txt", "b.txt"] {
            File::create(dir.path().join(name))
                .unwrap()
                .write_all(b"hello")
                .unwrap();
        }
        File::create(dir.path().join("c.txt"))
            .unwrap()
            .write_all(b"unrelated")
            .unwrap();

        let outcome = run_scan(dir.path(), WalkerConfig::default(), &NullSink, None).unwrap();
        (dir, outcome)
    }

    #[test]
    fn test_list_mentions_groups_and_members() {
        let (_dir, outcome) = scan_fixture();
        let rendered = render_list(&outcome);

        assert!(rendered.contains("Found 1 duplicate group(s)"));
        assert!(rendered.contains("a.txt"));
        assert!(rendered.contains("b.txt"));
        assert!(!rendered.contains("c.txt"));
    }

    #[test]
    fn test_list_reports_no_duplicates() {
        let dir = TempDir::new().unwrap();
        let outcome = run_scan(dir.path(), WalkerConfig::default(), &NullSink, None).unwrap();

        let rendered = render_list(&outcome);
        assert!(rendered.contains("No duplicates found"));
    }

    #[test]
    fn test_json_shape() {
        let (_dir, outcome) = scan_fixture();
        let value = render_json(&outcome);

        assert_eq!(value["groups"].as_array().unwrap().len(), 1);
        let group = &value["groups"][0];
        assert_eq!(group["size"], 5);
        assert_eq!(group["files"].as_array().unwrap().len(), 2);
        assert_eq!(group["fingerprint"].as_str().unwrap().len(), 64);
        assert_eq!(value["stats"]["discovered"], 3);
    }
}
