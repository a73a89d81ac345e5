//! Config command - View and validate DriveMirror configuration
//!
//! Provides the `drivemirror config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file, including every task definition

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use drivemirror_core::config::{Config, ValidationError};

use crate::output::{plural, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
}

impl ConfigCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => show(config_path, format),
            ConfigCommand::Validate => validate(config_path, format),
        }
    }
}

fn show(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = format.formatter();
    let exists = config_path.exists();
    let config = if exists {
        Config::load(config_path).with_context(|| {
            format!("Failed to load configuration from {}", config_path.display())
        })?
    } else {
        Config::default()
    };

    info!(config_path = %config_path.display(), exists, "Showing configuration");

    if format.is_json() {
        let json = serde_json::to_value(&config)
            .context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
        return Ok(());
    }

    if exists {
        formatter.success(&format!("Configuration ({})", config_path.display()));
    } else {
        formatter.warn(&format!(
            "No configuration at {}, showing defaults",
            config_path.display()
        ));
    }
    formatter.info("");
    let yaml =
        serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
    for line in yaml.lines() {
        formatter.info(line);
    }
    Ok(())
}

/// Problems found in a configuration file, or the reason it could not be read
fn collect_errors(config_path: &Path) -> Vec<String> {
    if !config_path.exists() {
        return vec![format!(
            "Configuration file not found: {}",
            config_path.display()
        )];
    }
    match Config::load(config_path) {
        Ok(config) => config.validate().iter().map(ValidationError::to_string).collect(),
        Err(e) => vec![format!("Failed to parse configuration: {e:#}")],
    }
}

fn validate(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = format.formatter();
    info!(config_path = %config_path.display(), "Validating configuration");

    let errors = collect_errors(config_path);

    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "config_path": config_path.display().to_string(),
            "errors": errors,
        }));
    } else if errors.is_empty() {
        formatter.success("Configuration is valid");
        formatter.info(&format!("File: {}", config_path.display()));
    } else {
        formatter.error(&format!(
            "Configuration has {}:",
            plural(errors.len() as u64, "error")
        ));
        formatter.info(&format!("File: {}", config_path.display()));
        for error in &errors {
            formatter.info(&format!("  - {error}"));
        }
    }
    Ok(())
}
