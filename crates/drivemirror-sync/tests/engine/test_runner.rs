//! Task runner scenarios: validation, isolation, policy precedence

use std::sync::atomic::Ordering;
use std::sync::Arc;

use drivemirror_core::config::TaskConfig;
use drivemirror_core::domain::{RunResult, TaskResult, UpdatePolicy};
use drivemirror_sync::manifest::RenameManifest;
use drivemirror_sync::retry::RetryPolicy;
use drivemirror_sync::TaskRunner;
use tempfile::TempDir;

use crate::common::*;

fn runner(fake: &Arc<FakeDrive>, dir: &TempDir) -> TaskRunner {
    TaskRunner::new(
        fake.clone(),
        RetryPolicy::default(),
        RenameManifest::new(dir.path().join("manifest.csv")),
    )
}

#[tokio::test]
async fn test_sharepoint_task_end_to_end() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("finance");
    seed_local(&base);
    let fake = Arc::new(finance_library());
    let task = TaskConfig::sharepoint(SITE_URL, "Documents", &base).with_name("finance");

    let result = runner(&fake, &dir)
        .run_task(0, &task, UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(
        result,
        TaskResult {
            downloaded: 2,
            skipped: 1,
            errors: 0
        }
    );
    assert!(base.join("Reports").join("q1.csv").is_file());
    assert_eq!(fake.resolve_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_local_root_is_created() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("fresh/mirror");
    let fake = Arc::new(finance_library());
    let task = TaskConfig::sharepoint(SITE_URL, "Documents", &base);

    let result = runner(&fake, &dir)
        .run_task(0, &task, UpdatePolicy::RenameNew, false)
        .await;

    assert_eq!(result.downloaded, 3);
    assert_eq!(names_in(&base), vec!["Reports", "changed.txt", "same.txt"]);
}

#[tokio::test]
async fn test_invalid_task_makes_no_remote_calls() {
    let dir = TempDir::new().unwrap();
    let fake = Arc::new(finance_library());
    let mut task = TaskConfig::sharepoint(SITE_URL, "Documents", dir.path().join("x"));
    task.library = None;

    let result = runner(&fake, &dir)
        .run_task(0, &task, UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(result, TaskResult::failed());
    assert_eq!(fake.remote_calls(), 0);
    assert!(!dir.path().join("x").exists());
}

#[tokio::test]
async fn test_unresolvable_root_is_one_error() {
    let dir = TempDir::new().unwrap();
    let fake = Arc::new(finance_library());
    let task = TaskConfig::sharepoint(SITE_URL, "Archive", dir.path().join("archive"));

    let result = runner(&fake, &dir)
        .run_task(0, &task, UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(result, TaskResult::failed());
    assert_eq!(fake.resolve_calls.load(Ordering::SeqCst), 1);
    assert_eq!(fake.list_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_batch_continues_past_failed_tasks() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("finance");
    seed_local(&base);
    let fake = Arc::new(finance_library());

    let mut missing_user = TaskConfig::onedrive("adele@contoso.com", dir.path().join("adele"));
    missing_user.user = None;
    let tasks = vec![
        missing_user,
        TaskConfig::sharepoint(SITE_URL, "Documents", &base),
        TaskConfig::onedrive("megan@contoso.com", dir.path().join("megan")),
    ];

    let run = runner(&fake, &dir)
        .run_all(&tasks, UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(
        run,
        RunResult {
            tasks: 3,
            downloaded: 2,
            skipped: 1,
            errors: 2
        }
    );
    assert!(run.has_errors());
}

#[tokio::test]
async fn test_task_policy_overrides_global() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("finance");
    seed_local(&base);
    let fake = Arc::new(finance_library());
    let task = TaskConfig::sharepoint(SITE_URL, "Documents", &base)
        .with_update_action(UpdatePolicy::RenameNew);

    runner(&fake, &dir)
        .run_task(0, &task, UpdatePolicy::Overwrite, false)
        .await;

    assert!(names_in(&base).iter().any(|n| n.starts_with("changed_prev_")));
}

#[tokio::test]
async fn test_dry_run_creates_no_local_root() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("not-yet");
    let fake = Arc::new(finance_library());
    let task = TaskConfig::sharepoint(SITE_URL, "Documents", &base);

    let run = runner(&fake, &dir)
        .run_all(std::slice::from_ref(&task), UpdatePolicy::RenameNew, true)
        .await;

    assert_eq!(run.downloaded, 3);
    assert_eq!(run.errors, 0);
    assert!(!base.exists());
    assert_eq!(fake.download_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_item_errors_carry_task_index_and_name() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("out");
    let fake = Arc::new(
        FakeDrive::new().folder(ROOT, vec![vec![file("MISSING", "gone.txt", 3)]]),
    );
    let task = TaskConfig::sharepoint(SITE_URL, "Documents", &base).with_name("payroll");
    let logs = LogCapture::default();
    let _guard = logs.install();

    let result = runner(&fake, &dir)
        .run_task(7, &task, UpdatePolicy::Overwrite, false)
        .await;

    assert_eq!(result.errors, 1);
    let lines = logs.lines();
    let failure = lines
        .iter()
        .find(|l| l.contains("Failed to update local file"))
        .unwrap();
    assert!(failure.contains("task{task_index=7 task=payroll}"), "{failure}");
    assert!(failure.contains("name=gone.txt"), "{failure}");
    assert!(failure.contains("Not found: MISSING"), "{failure}");
}
