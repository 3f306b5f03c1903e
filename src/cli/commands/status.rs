//! Status command implementation
//!
//! This module implements the `status` command for displaying the failure
//! ledger and the quarantined artifacts left by earlier runs.

use crate::config::load_config_or_default;
use crate::core::export::FailureLedger;
use crate::core::integrity::quarantine_dir_name;
use crate::domain::ids::InstanceHost;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix shared by every quarantine directory
const QUARANTINE_PREFIX: &str = "Bad_Jsons_";

/// Arguments for the status command
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Only show the quarantine directory of this instance
    #[arg(short, long)]
    pub instance: Option<String>,

    /// Maximum number of ledger entries to print
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        println!("📊 Sync Status");
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let ledger_path = &config.export.ledger_path;
        let entries = match FailureLedger::read_entries(ledger_path) {
            Ok(entries) => entries,
            Err(e) => {
                println!("❌ Failed to read failure ledger");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        if entries.is_empty() {
            println!("No failed exports recorded in {}.", ledger_path.display());
        } else {
            println!(
                "Found {} failed export(s) in {}:",
                entries.len(),
                ledger_path.display()
            );
            for entry in entries.iter().take(self.limit) {
                println!("  {entry}");
            }
            if entries.len() > self.limit {
                println!("  ... and {} more", entries.len() - self.limit);
            }
        }
        println!();

        let dirs = match &self.instance {
            Some(host) => match InstanceHost::new(host.as_str()) {
                Ok(host) => vec![config
                    .layout
                    .quarantine_parent
                    .join(quarantine_dir_name(&host))],
                Err(e) => {
                    println!("❌ Invalid instance: {e}");
                    return Ok(2);
                }
            },
            None => quarantine_dirs(&config.layout.quarantine_parent)?,
        };

        if dirs.is_empty() {
            println!("No quarantine directories found.");
        }
        for dir in dirs {
            let files = quarantined_files(&dir)?;
            println!("🗑️  {} ({} file(s))", dir.display(), files.len());
            for file in files {
                println!("  {file}");
            }
        }
        println!();

        Ok(0)
    }
}

/// Every `Bad_Jsons_*` directory directly under `parent`, sorted
fn quarantine_dirs(parent: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !parent.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs: Vec<PathBuf> = fs::read_dir(parent)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(QUARANTINE_PREFIX)
        })
        .map(|entry| entry.path())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// File names inside a quarantine directory, sorted; missing directory is empty
fn quarantined_files(dir: &Path) -> std::io::Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<String> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    Ok(files)
}
