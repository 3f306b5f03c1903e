//! Sync command implementation
//!
//! This module implements the `sync` command: the full pipeline from manifest
//! to a sanitized department tree.

use crate::adapters::gzr::ProcessRunner;
use crate::adapters::manifest::Manifest;
use crate::config::{load_config_or_default, load_credentials};
use crate::core::export::SyncCoordinator;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Failed exports shown in the report before truncating
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// The looker.ini file with the API credentials
    #[arg(short = 'l', long, default_value = "looker.ini")]
    pub looker_ini: PathBuf,

    /// CSV manifest listing the content to export
    #[arg(short = 'f', long)]
    pub source_csv: PathBuf,

    /// Target instance (IP or hostname); derived from base_url when omitted
    #[arg(short, long)]
    pub instance: Option<String>,

    /// Folder that houses the downloaded content (overrides layout.output_root)
    #[arg(short = 'p', long)]
    pub start_path: Option<PathBuf>,

    /// Log each export command instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Exports running at the same time (overrides export.parallel_exports)
    #[arg(long, value_name = "N")]
    pub parallel: Option<usize>,

    /// Seconds to wait for each export (overrides export.timeout_secs)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        // Load configuration
        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(start_path) = &self.start_path {
            tracing::info!(start_path = %start_path.display(), "Overriding output root from CLI");
            config.layout.output_root = start_path.clone();
        }

        if let Some(parallel) = self.parallel {
            tracing::info!(parallel, "Overriding parallel exports from CLI");
            config.export.parallel_exports = parallel;
        }

        if let Some(timeout) = self.timeout {
            tracing::info!(timeout_secs = timeout, "Overriding export timeout from CLI");
            config.export.timeout_secs = timeout;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        // Load credentials and resolve the target instance
        let credentials = match load_credentials(&self.looker_ini) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load credentials");
                eprintln!("Failed to load credentials: {e}");
                return Ok(2);
            }
        };

        let instance = match credentials.resolve_instance(self.instance.as_deref()) {
            Ok(i) => i,
            Err(e) => {
                tracing::error!(error = %e, "Cannot determine target instance");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        // Load manifest
        let manifest = match Manifest::from_path(&self.source_csv) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load manifest");
                eprintln!("Failed to load manifest: {e}");
                return Ok(2);
            }
        };

        let dry_run = config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - no export will be executed");
            println!("🔍 DRY RUN MODE - export commands are logged, not executed");
            println!("   Quarantine and title changes are reported, not applied");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !dry_run {
            println!("Sync Configuration:");
            println!("  Instance: {instance}");
            println!("  Manifest: {} ({} rows)", self.source_csv.display(), manifest.len());
            println!("  Output root: {}", config.layout.output_root.display());
            println!("  Export binary: {}", config.export.binary);
            println!("  Timeout: {}s", config.export.timeout_secs);
            println!("  Parallel exports: {}", config.export.parallel_exports);
            println!();
            print!("Proceed with sync? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Sync cancelled.");
                return Ok(0);
            }
        }

        let ledger_path = config.export.ledger_path.clone();
        let coordinator =
            SyncCoordinator::new(config, Arc::new(ProcessRunner::new()), shutdown_signal);

        tracing::info!("Executing sync");
        println!("🚀 Starting sync...");
        println!();

        let summary = match coordinator
            .execute_sync(&manifest, credentials, instance)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(5);
            }
        };
        summary.log_summary();

        // Display summary
        println!();
        println!("📊 Sync Summary:");
        println!("  Manifest rows: {}", summary.total_rows);
        println!("  Departments: {}", summary.departments);
        println!("  Dispatched: {}", summary.dispatched);
        if dry_run {
            println!("  Rendered (dry run): {}", summary.dry_run);
        } else {
            println!("  Exported: {}", summary.exported);
            println!("  Failed: {}", summary.failed());
        }
        println!(
            "  Skipped rows: {} ({} without id)",
            summary.skipped.len(),
            summary.missing_ids()
        );
        if summary.cancelled > 0 {
            println!("  Cancelled: {}", summary.cancelled);
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!("  Success Rate: {:.2}%", summary.success_rate());
        println!();

        if let (Some(sweep), Some(cleanse)) = (&summary.sweep, &summary.cleanse) {
            if dry_run {
                println!("🧹 Sanitize Preview (nothing changed):");
                println!("  Would quarantine: {}", sweep.quarantined.len());
                println!("  Would rename: {}", cleanse.renamed.len());
            } else {
                println!("🧹 Sanitize Results:");
                println!("  Quarantined: {}", sweep.quarantined.len());
                println!("  Titles renamed: {}", cleanse.renamed.len());
            }
            println!("  Without deleted_at: {}", sweep.unmarked);
            println!("  Skipped artifacts: {}", sweep.skipped + cleanse.skipped);
            println!();
        }

        if !summary.failures.is_empty() {
            println!("⚠️  Failed exports (see {}):", ledger_path.display());
            for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
                println!("  - line {}: {}", failure.line, failure.failure);
            }
            if summary.failures.len() > MAX_LISTED_FAILURES {
                println!(
                    "  ... and {} more failures",
                    summary.failures.len() - MAX_LISTED_FAILURES
                );
            }
            println!();
        }

        // Determine exit code
        let exit_code = if summary.interrupted {
            println!("⚠️  Sync interrupted. Sanitize was skipped.");
            println!("   Run 'gzr-sync sanitize' once the tree is complete.");
            println!();
            tracing::info!("Sync interrupted by user signal");
            130
        } else if summary.is_successful() {
            println!("✅ Sync completed successfully!");
            0
        } else {
            println!("⚠️  Sync completed with failures");
            1
        };

        Ok(exit_code)
    }
}
