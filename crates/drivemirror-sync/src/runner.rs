//! Task runner
//!
//! Runs the configured tasks one after another. Each task gets a fresh
//! [`TaskResult`]; whatever goes wrong inside a task (invalid definition,
//! unresolvable root, failures during the walk) is logged with the task index
//! and ends up in that task's error count. The batch always continues.

use std::sync::Arc;

use drivemirror_core::config::TaskConfig;
use drivemirror_core::domain::{RunResult, TaskResult, UpdatePolicy};
use drivemirror_core::ports::ICloudProvider;
use tracing::{error, info, info_span, Instrument};

use crate::manifest::RenameManifest;
use crate::retry::RetryPolicy;
use crate::walker::TreeWalker;

/// Runs mirroring tasks against a cloud provider
pub struct TaskRunner {
    provider: Arc<dyn ICloudProvider>,
    retry: RetryPolicy,
    manifest: RenameManifest,
}

impl TaskRunner {
    pub fn new(
        provider: Arc<dyn ICloudProvider>,
        retry: RetryPolicy,
        manifest: RenameManifest,
    ) -> Self {
        Self {
            provider,
            retry,
            manifest,
        }
    }

    /// Runs a single task
    ///
    /// The task's own `update_action` wins over `global_policy`. Every line
    /// logged while the task runs is inside a `task` span carrying its index
    /// and label.
    pub async fn run_task(
        &self,
        index: usize,
        task: &TaskConfig,
        global_policy: UpdatePolicy,
        dry_run: bool,
    ) -> TaskResult {
        let label = task.label(index);
        let span = info_span!("task", task_index = index, task = %label);
        self.run_task_in_span(index, &label, task, global_policy, dry_run)
            .instrument(span)
            .await
    }

    async fn run_task_in_span(
        &self,
        index: usize,
        label: &str,
        task: &TaskConfig,
        global_policy: UpdatePolicy,
        dry_run: bool,
    ) -> TaskResult {
        let target = match task.target(index) {
            Ok(target) => target,
            Err(errors) => {
                for e in &errors {
                    error!(event = "error", task_index = index, task = %label, field = %e.field, "Invalid task: {}", e.message);
                }
                return TaskResult::failed();
            }
        };
        let policy = task.effective_policy(global_policy);

        info!(
            task_index = index,
            task = %label,
            local_path = %target.local_path.display(),
            %policy,
            dry_run,
            "Starting task"
        );

        let root = match self
            .retry
            .execute("resolve_root", || self.provider.resolve_root(&target.root))
            .await
        {
            Ok(root) => root,
            Err(e) => {
                error!(event = "error", task_index = index, task = %label, error = %e, "Failed to resolve task root");
                return TaskResult::failed();
            }
        };

        if !dry_run {
            if let Err(e) = tokio::fs::create_dir_all(&target.local_path).await {
                error!(
                    event = "error",
                    task_index = index,
                    task = %label,
                    path = %target.local_path.display(),
                    error = %e,
                    "Failed to create local root"
                );
                return TaskResult::failed();
            }
        }

        let walker = TreeWalker::new(self.provider.as_ref(), self.retry, &self.manifest);
        let result = walker
            .walk(
                &root.container_id,
                &root.root_item_id,
                &target.local_path,
                policy,
                dry_run,
            )
            .await;

        info!(
            event = "task_summary",
            task_index = index,
            task = %label,
            downloaded = result.downloaded,
            skipped = result.skipped,
            errors = result.errors,
            "Task finished"
        );
        result
    }

    /// Runs every task in order and accumulates the results
    pub async fn run_all(
        &self,
        tasks: &[TaskConfig],
        global_policy: UpdatePolicy,
        dry_run: bool,
    ) -> RunResult {
        let mut run = RunResult::default();
        for (index, task) in tasks.iter().enumerate() {
            let result = self.run_task(index, task, global_policy, dry_run).await;
            run.accumulate(&result);
        }

        info!(
            event = "run_summary",
            tasks = run.tasks,
            downloaded = run.downloaded,
            skipped = run.skipped,
            errors = run.errors,
            dry_run,
            "Run finished"
        );
        run
    }
}
