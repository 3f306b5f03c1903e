//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for gzr-sync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// gzr-sync - Looker content export pipeline
#[derive(Parser, Debug)]
#[command(name = "gzr-sync")]
#[command(version, about, long_about = None)]
#[command(author = "gzr-sync Contributors")]
pub struct Cli {
    /// Path to the runtime configuration file (defaults to gzr-sync.toml when present)
    #[arg(short, long, env = "GZR_SYNC_CONFIG", global = true)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GZR_SYNC_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Materialize folders, export every manifest record, then sanitize the tree
    Sync(commands::sync::SyncArgs),

    /// Run the quarantine sweep and the title cleanse over an existing tree
    Sanitize(commands::sanitize::SanitizeArgs),

    /// Validate configuration, credentials and manifest
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show failure ledger entries and quarantined files
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
