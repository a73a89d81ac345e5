//! Sync command - Mirror every configured task
//!
//! Provides the `drivemirror sync` CLI command which:
//! 1. Loads and checks the configuration
//! 2. Installs console and run-log logging
//! 3. Acquires an app-only Graph token
//! 4. Runs every task and prints the run totals
//!
//! A missing configuration file or a failed authentication stops the command
//! before any task runs. Per-task failures only show up in the totals; the
//! process exits with status 1 when any error was counted.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::{info, warn};

use drivemirror_core::config::Config;
use drivemirror_core::domain::{RunResult, UpdatePolicy};
use drivemirror_graph::auth::acquire_access_token;
use drivemirror_graph::{GraphClient, GraphCloudProvider};
use drivemirror_sync::manifest::RenameManifest;
use drivemirror_sync::retry::RetryPolicy;
use drivemirror_sync::TaskRunner;

use crate::logging;
use crate::output::{plural, OutputFormat};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Show what would be done without touching the local tree
    #[arg(long)]
    pub dry_run: bool,

    /// Default action for changed files (Overwrite or RenameNew); a task's
    /// own update_action still wins
    #[arg(long, value_name = "ACTION")]
    pub update_action: Option<UpdatePolicy>,
}

impl SyncCommand {
    pub async fn execute(
        &self,
        config_path: &Path,
        verbose: u8,
        format: OutputFormat,
    ) -> Result<ExitCode> {
        let formatter = format.formatter();

        let config = Config::load(config_path).with_context(|| {
            format!("Failed to load configuration from {}", config_path.display())
        })?;

        let settings_errors = config.validate_settings();
        if !settings_errors.is_empty() {
            for e in &settings_errors {
                formatter.error(&e.to_string());
            }
            bail!(
                "Configuration has {}",
                plural(settings_errors.len() as u64, "error")
            );
        }

        let _log_guard = logging::init_with_file(&config.logging, verbose)?;
        info!(
            config_path = %config_path.display(),
            run_log = %config.logging.file.display(),
            tasks = config.tasks.len(),
            dry_run = self.dry_run,
            "Loaded configuration"
        );

        if config.tasks.is_empty() {
            warn!("No tasks configured");
            formatter.warn("No tasks configured");
        }

        let token = acquire_access_token(&config.auth, |key| std::env::var(key).ok())
            .await
            .context("Authentication failed")?;

        let client = GraphClient::with_base_url(token.secret, config.auth.graph_base_url.as_str());
        let provider = Arc::new(GraphCloudProvider::new(client));
        let runner = TaskRunner::new(
            provider,
            RetryPolicy::from_config(&config.retry),
            RenameManifest::new(&config.manifest.file),
        );

        let policy = self.update_action.unwrap_or(config.defaults.update_action);
        if self.dry_run {
            formatter.info("Dry run: no local changes will be made");
        }

        let started = Instant::now();
        let run = runner.run_all(&config.tasks, policy, self.dry_run).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        self.report(&run, duration_ms, &config, format)?;

        Ok(if run.has_errors() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }

    fn report(
        &self,
        run: &RunResult,
        duration_ms: u64,
        config: &Config,
        format: OutputFormat,
    ) -> Result<()> {
        let formatter = format.formatter();

        if format.is_json() {
            let mut json = serde_json::to_value(run).context("Failed to serialize run result")?;
            json["dry_run"] = serde_json::Value::Bool(self.dry_run);
            json["duration_ms"] = serde_json::Value::from(duration_ms);
            formatter.print_json(&json);
            return Ok(());
        }

        let duration = if duration_ms >= 1000 {
            format!("{:.1}s", duration_ms as f64 / 1000.0)
        } else {
            format!("{duration_ms}ms")
        };
        if self.dry_run {
            formatter.success(&format!("Dry run completed in {duration}"));
        } else {
            formatter.success(&format!("Sync completed in {duration}"));
        }

        formatter.count("Tasks", run.tasks);
        formatter.count("Downloaded", run.downloaded);
        formatter.count("Skipped", run.skipped);
        formatter.count("Errors", run.errors);

        if run.has_errors() {
            formatter.error(&format!(
                "{} occurred, see {}",
                plural(run.errors, "error"),
                config.logging.file.display()
            ));
        }
        Ok(())
    }
}
