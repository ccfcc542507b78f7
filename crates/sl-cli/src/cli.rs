//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Spendlake - marketing spend and revenue into one warehouse
#[derive(Parser, Debug)]
#[command(name = "sl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Named target from the config (falls back to SL_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Warehouse connection override: DuckDB path, :memory: or postgres:// URL
    #[arg(short, long, global = true)]
    pub warehouse: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the three sources and report what was read
    Ingest(IngestArgs),

    /// Ingest and validate, writing the issue report only
    Validate(ValidateArgs),

    /// Ingest, validate and refresh the warehouse
    Run(RunArgs),
}

/// Arguments for the ingest command
#[derive(Args, Debug, Default)]
pub struct IngestArgs {}

/// Arguments for the validate command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Write the issue report here instead of the configured location
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Exit non-zero when any issue was recorded
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Write the issue report here instead of the configured location
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Override retry.max_attempts from the config
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
