//! Validate config command implementation
//!
//! This module implements the `validate-config` command for checking the
//! runtime configuration and, when given, the credentials file and manifest.

use crate::adapters::manifest::Manifest;
use crate::config::{load_config_or_default, load_credentials, DEFAULT_CONFIG_FILE};
use crate::core::layout::distinct_departments;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Credentials file to check
    #[arg(short = 'l', long)]
    pub looker_ini: Option<PathBuf>,

    /// Manifest to check
    #[arg(short = 'f', long)]
    pub source_csv: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let shown_path = config_path.unwrap_or(DEFAULT_CONFIG_FILE);
        tracing::info!(config_path = %shown_path, "Validating configuration");

        println!("🔍 Validating configuration file: {shown_path}");
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Export Binary: {}", config.export.binary);
        println!("  Timeout: {}s", config.export.timeout_secs);
        println!("  Parallel Exports: {}", config.export.parallel_exports);
        println!("  TLS Verification: {}", config.export.verify_tls);
        println!("  Failure Ledger: {}", config.export.ledger_path.display());
        println!("  Output Root: {}", config.layout.output_root.display());
        println!(
            "  Quarantine Parent: {}",
            config.layout.quarantine_parent.display()
        );
        println!();

        let mut exit_code = 0;

        if let Some(path) = &self.looker_ini {
            match load_credentials(path) {
                Ok(credentials) => {
                    println!("✅ Credentials loaded: {}", path.display());
                    println!("  Client ID: {}", credentials.client_id);
                    match credentials.resolve_instance(None) {
                        Ok(instance) => println!("  Instance (from base_url): {instance}"),
                        Err(_) => println!("  Instance: none, pass --instance to sync"),
                    }
                }
                Err(e) => {
                    println!("❌ Credentials invalid");
                    println!("   Error: {e}");
                    exit_code = 2;
                }
            }
            println!();
        }

        if let Some(path) = &self.source_csv {
            match Manifest::from_path(path) {
                Ok(manifest) => {
                    let (records, skipped) = manifest.partition();
                    let departments: Vec<_> =
                        manifest.rows().iter().map(|r| r.department.clone()).collect();
                    println!("✅ Manifest loaded: {}", path.display());
                    println!("  Rows: {}", manifest.len());
                    println!("  Exportable: {}", records.len());
                    println!("  Skipped: {}", skipped.len());
                    println!(
                        "  Departments: {}",
                        distinct_departments(&departments).len()
                    );
                    for (line, reason) in skipped.iter().take(10) {
                        println!("    - line {line}: {reason}");
                    }
                }
                Err(e) => {
                    println!("❌ Manifest invalid");
                    println!("   Error: {e}");
                    exit_code = 2;
                }
            }
            println!();
        }

        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_defaults() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("gzr-sync.toml");
        fs::write(&config, "[export]\ntimeout_secs = 7\n").unwrap();

        let code = ValidateArgs::default()
            .execute(config.to_str())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_invalid_config() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("gzr-sync.toml");
        fs::write(&config, "[export]\nparallel_exports = 0\n").unwrap();

        let code = ValidateArgs::default()
            .execute(config.to_str())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_bad_manifest() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("gzr-sync.toml");
        fs::write(&config, "").unwrap();
        let csv = temp.path().join("content.csv");
        fs::write(&csv, "Type,Title\nlook,a\n").unwrap();

        let args = ValidateArgs {
            looker_ini: None,
            source_csv: Some(csv),
        };
        assert_eq!(args.execute(config.to_str()).await.unwrap(), 2);
    }
}
