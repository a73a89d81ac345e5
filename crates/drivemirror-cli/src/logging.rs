//! Tracing setup
//!
//! `sync` logs to the console and appends a plain-text run log to
//! `logging.file`. The other commands only log to the console.
//!
//! The level comes from `logging.level`, `-v` raises it to `debug` and `-vv`
//! to `trace`. `RUST_LOG` overrides both.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use drivemirror_core::config::LoggingConfig;

fn level_for(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Console-only logging
pub fn init_console(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level_for("warn", verbose)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Console plus run-log file
///
/// The returned guard flushes the file writer on drop; keep it alive until
/// the process exits.
pub fn init_with_file(config: &LoggingConfig, verbose: u8) -> Result<WorkerGuard> {
    let file_name = config
        .file
        .file_name()
        .with_context(|| format!("logging.file has no file name: {}", config.file.display()))?;
    let directory = config
        .file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(env_filter(level_for(&config.level, verbose)))
        .init();

    Ok(guard)
}
