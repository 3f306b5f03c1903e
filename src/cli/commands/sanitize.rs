//! Sanitize command implementation
//!
//! This module implements the `sanitize` command: the quarantine sweep and
//! the title cleanse on their own, over a tree produced by an earlier sync.

use crate::config::{load_config_or_default, load_credentials};
use crate::core::integrity::{run_integrity_pass, QuarantineSweep};
use crate::domain::ids::InstanceHost;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the sanitize command
#[derive(Args, Debug)]
pub struct SanitizeArgs {
    /// Target instance, used to name the quarantine directory
    #[arg(short, long)]
    pub instance: Option<String>,

    /// Credentials file to derive the instance from when --instance is omitted
    #[arg(short = 'l', long, default_value = "looker.ini")]
    pub looker_ini: PathBuf,

    /// Folder that houses the downloaded content (overrides layout.output_root)
    #[arg(short = 'p', long)]
    pub start_path: Option<PathBuf>,

    /// Report what would be quarantined and renamed without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl SanitizeArgs {
    /// Execute the sanitize command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        tracing::info!("Starting sanitize command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        if let Some(start_path) = &self.start_path {
            config.layout.output_root = start_path.clone();
        }

        let instance = match self.resolve_instance() {
            Ok(i) => i,
            Err(e) => {
                tracing::error!(error = %e, "Cannot determine target instance");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let root = config.layout.output_root.clone();
        if !root.is_dir() {
            eprintln!("Output root does not exist: {}", root.display());
            return Ok(2);
        }

        if self.dry_run {
            println!("🔍 DRY RUN MODE - no artifact will be moved or rewritten");
        }
        println!("🧹 Sanitizing {}", root.display());
        println!();

        let sweep = QuarantineSweep::for_instance(
            &root,
            &config.layout.quarantine_parent,
            &instance,
        )
        .with_preview(self.dry_run);
        let quarantine_dir = sweep.quarantine_dir().to_path_buf();
        let (sweep_report, cleanse_report) =
            match tokio::task::spawn_blocking(move || run_integrity_pass(&sweep)).await? {
                Ok(reports) => reports,
                Err(e) => {
                    tracing::error!(error = %e, "Sanitize failed");
                    eprintln!("Sanitize failed: {e}");
                    return Ok(5);
                }
            };

        println!("📊 Sanitize Summary:");
        println!("  Artifacts scanned: {}", sweep_report.scanned);
        println!(
            "  Quarantined: {} (into {})",
            sweep_report.quarantined.len(),
            quarantine_dir.display()
        );
        println!("  Titles renamed: {}", cleanse_report.renamed.len());
        println!("  Untitled: {}", cleanse_report.untitled);
        println!("  Without deleted_at: {}", sweep_report.unmarked);
        println!(
            "  Skipped artifacts: {}",
            sweep_report.skipped + cleanse_report.skipped
        );
        println!();

        for rename in &cleanse_report.renamed {
            println!("  ✏️  {} → {}", rename.from, rename.to);
        }

        println!("✅ Sanitize completed");
        Ok(0)
    }

    fn resolve_instance(&self) -> crate::domain::Result<InstanceHost> {
        match &self.instance {
            Some(host) => InstanceHost::new(host.as_str())
                .map_err(crate::domain::SyncError::Configuration),
            None => load_credentials(&self.looker_ini)?.resolve_instance(None),
        }
    }
}
