//! Per-task and per-run counters

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Counters for one task
///
/// A fresh value is created for each task and threaded through the walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub downloaded: u64,
    pub skipped: u64,
    pub errors: u64,
}

impl TaskResult {
    pub fn record_download(&mut self) {
        self.downloaded += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Result of a task that failed before any item was processed
    #[must_use]
    pub fn failed() -> Self {
        Self {
            errors: 1,
            ..Self::default()
        }
    }
}

impl AddAssign for TaskResult {
    fn add_assign(&mut self, other: Self) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }
}

/// Aggregate counters for a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub tasks: u64,
    pub downloaded: u64,
    pub skipped: u64,
    pub errors: u64,
}

impl RunResult {
    /// Fold one finished task into the run totals
    pub fn accumulate(&mut self, task: &TaskResult) {
        self.tasks += 1;
        self.downloaded += task.downloaded;
        self.skipped += task.skipped;
        self.errors += task.errors;
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
