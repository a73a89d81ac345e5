//! DriveMirror CLI - Command-line interface for DriveMirror
//!
//! Provides commands for:
//! - Mirroring every configured SharePoint library and OneDrive folder
//! - Viewing and validating the configuration

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use drivemirror_core::config::Config;

mod commands;
mod logging;
mod output;

use commands::{config::ConfigCommand, sync::SyncCommand};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "drivemirror",
    version,
    about = "One-way mirror of SharePoint and OneDrive folders"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mirror every configured task
    Sync(SyncCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Sync(cmd) => cmd.execute(&config_path, cli.verbose, format).await,
        Commands::Config(cmd) => {
            logging::init_console(cli.verbose);
            cmd.execute(&config_path, format).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
