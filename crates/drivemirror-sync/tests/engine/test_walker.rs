//! Tree walker scenarios

use std::sync::atomic::Ordering;

use drivemirror_core::domain::{TaskResult, UpdatePolicy};
use drivemirror_sync::manifest::RenameManifest;
use drivemirror_sync::retry::RetryPolicy;
use drivemirror_sync::walker::TreeWalker;
use tempfile::TempDir;

use crate::common::*;

fn counts(downloaded: u64, skipped: u64, errors: u64) -> TaskResult {
    TaskResult {
        downloaded,
        skipped,
        errors,
    }
}

// ============================================================================
// Full traversal
// ============================================================================

#[tokio::test]
async fn test_mirrors_nested_library() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("finance");
    seed_local(&base);
    let fake = finance_library();
    let manifest = RenameManifest::new(dir.path().join("manifest.csv"));
    let walker = TreeWalker::new(&fake, RetryPolicy::default(), &manifest);

    let result = walker
        .walk(&drive(), &item_id(ROOT), &base, UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(result, counts(2, 1, 0));
    assert_eq!(std::fs::read(base.join("changed.txt")).unwrap(), b"changed");
    assert_eq!(std::fs::read(base.join("Reports/q1.csv")).unwrap(), b"a,b,c");
    assert_eq!(std::fs::read(base.join("same.txt")).unwrap(), b"same");
    assert_eq!(fake.downloaded(), vec!["CHANGED1", "NEW01"]);
    // Two root pages plus one page for the subfolder
    assert_eq!(fake.list_calls.load(Ordering::SeqCst), 3);
    assert!(!manifest.path().exists());
}

#[tokio::test]
async fn test_dry_run_counts_match_but_nothing_changes() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("finance");
    seed_local(&base);
    let fake = finance_library();
    let manifest = RenameManifest::new(dir.path().join("manifest.csv"));
    let walker = TreeWalker::new(&fake, RetryPolicy::default(), &manifest);

    let result = walker
        .walk(&drive(), &item_id(ROOT), &base, UpdatePolicy::RenameNew, true)
        .await;

    assert_eq!(result, counts(2, 1, 0));
    assert_eq!(fake.download_calls.load(Ordering::SeqCst), 0);
    assert_eq!(names_in(&base), vec!["changed.txt", "same.txt"]);
    assert_eq!(std::fs::read(base.join("changed.txt")).unwrap(), b"old");
    assert!(!manifest.path().exists());
}

#[tokio::test]
async fn test_second_overwrite_run_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("finance");
    seed_local(&base);
    let fake = finance_library();
    let manifest = RenameManifest::new(dir.path().join("manifest.csv"));
    let walker = TreeWalker::new(&fake, RetryPolicy::default(), &manifest);

    walker
        .walk(&drive(), &item_id(ROOT), &base, UpdatePolicy::Overwrite, false)
        .await;
    let second = walker
        .walk(&drive(), &item_id(ROOT), &base, UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(second, counts(0, 3, 0));
    assert_eq!(fake.download_calls.load(Ordering::SeqCst), 2);
    assert_eq!(names_in(&base), vec!["Reports", "changed.txt", "same.txt"]);
}

// ============================================================================
// Special items
// ============================================================================

#[tokio::test]
async fn test_package_items_are_skipped() {
    let dir = TempDir::new().unwrap();
    let fake = FakeDrive::new()
        .folder(
            ROOT,
            vec![vec![folder("NB01", "Team Notebook").as_package()]],
        )
        .folder("NB01", vec![vec![file("SEC01", "section.one", 10)]]);
    let manifest = RenameManifest::new(dir.path().join("manifest.csv"));
    let walker = TreeWalker::new(&fake, RetryPolicy::default(), &manifest);

    let result = walker
        .walk(&drive(), &item_id(ROOT), dir.path(), UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(result, counts(0, 1, 0));
    assert_eq!(fake.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fake.download_calls.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("Team Notebook").exists());
}

#[tokio::test]
async fn test_file_package_with_full_metadata_is_skipped() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("out");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::write(base.join("Roadmap.one"), b"old").unwrap();
    let fake = FakeDrive::new()
        .folder(
            ROOT,
            vec![vec![
                hashed_file("PKG01", "Roadmap.one", 4, SAME_SHA256).as_package()
            ]],
        )
        .content("PKG01", b"same");
    let manifest = RenameManifest::new(dir.path().join("manifest.csv"));
    let walker = TreeWalker::new(&fake, RetryPolicy::default(), &manifest);

    let result = walker
        .walk(&drive(), &item_id(ROOT), &base, UpdatePolicy::RenameNew, false)
        .await;

    assert_eq!(result, counts(0, 1, 0));
    assert_eq!(fake.download_calls.load(Ordering::SeqCst), 0);
    assert_eq!(names_in(&base), vec!["Roadmap.one"]);
    assert_eq!(std::fs::read(base.join("Roadmap.one")).unwrap(), b"old");
    assert!(!manifest.path().exists());
}

#[tokio::test]
async fn test_invalid_names_are_sanitized_and_recorded() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("out");
    let fake = FakeDrive::new()
        .folder(
            ROOT,
            vec![vec![file("01BYE5RZ3F2504E0", "Report:Q1?.docx", 4)]],
        )
        .content("01BYE5RZ3F2504E0", b"docx");
    let manifest = RenameManifest::new(dir.path().join("manifest.csv"));
    let walker = TreeWalker::new(&fake, RetryPolicy::default(), &manifest);

    let result = walker
        .walk(&drive(), &item_id(ROOT), &base, UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(result, counts(1, 0, 0));
    assert_eq!(names_in(&base), vec!["Report_Q1_.docx_3F2504E0"]);

    let rows = std::fs::read_to_string(manifest.path()).unwrap();
    let lines: Vec<&str> = rows.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(
        ",sanitized,Report:Q1?.docx,Report_Q1_.docx_3F2504E0,01BYE5RZ3F2504E0,b!drive-001"
    ));
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn test_failed_listing_abandons_only_that_subtree() {
    let dir = TempDir::new().unwrap();
    let fake = FakeDrive::new()
        .folder(
            ROOT,
            vec![vec![
                folder("BAD01", "Restricted"),
                folder("GOOD01", "Shared"),
                file("TOP01", "top.txt", 3),
            ]],
        )
        .failing("BAD01")
        .folder("GOOD01", vec![vec![file("G01", "g.txt", 1)]])
        .content("TOP01", b"top")
        .content("G01", b"g");
    let manifest = RenameManifest::new(dir.path().join("manifest.csv"));
    let walker = TreeWalker::new(&fake, RetryPolicy::default(), &manifest);

    let result = walker
        .walk(&drive(), &item_id(ROOT), dir.path(), UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(result, counts(2, 0, 1));
    assert!(dir.path().join("Shared/g.txt").exists());
    assert!(dir.path().join("top.txt").exists());
}

#[tokio::test]
async fn test_failed_download_does_not_stop_siblings() {
    let dir = TempDir::new().unwrap();
    let fake = FakeDrive::new()
        .folder(
            ROOT,
            vec![vec![file("MISSING", "gone.txt", 3), file("OK01", "ok.txt", 2)]],
        )
        .content("OK01", b"ok");
    let manifest = RenameManifest::new(dir.path().join("manifest.csv"));
    let walker = TreeWalker::new(&fake, RetryPolicy::default(), &manifest);

    let result = walker
        .walk(&drive(), &item_id(ROOT), dir.path(), UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(result, counts(1, 0, 1));
    assert_eq!(names_in(dir.path()), vec!["ok.txt"]);
}
