//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "gzr-sync.toml")]
    pub output: String,

    /// Include comments explaining every option
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing gzr-sync configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put your API3 credentials in looker.ini ([main] client_id, client_secret)");
                println!("  3. Validate: gzr-sync validate-config -l looker.ini -f content.csv");
                println!("  4. Run: gzr-sync sync -l looker.ini -f content.csv -i <instance>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# gzr-sync Configuration File

[application]
log_level = "info"
dry_run = false

[export]
binary = "gzr"
timeout_secs = 7
parallel_exports = 1
verify_tls = false
ledger_path = "dodgy_entries.txt"
redact_ledger_secrets = false

[layout]
output_root = "Dept_Folders"
quarantine_parent = "."

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# gzr-sync Configuration File
#
# Every value below is the default; delete what you do not change.
# ${VAR} placeholders are replaced from the environment, and
# GZR_SYNC_<SECTION>_<KEY> variables override any value.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Log export commands instead of running them
dry_run = false

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Export binary, resolved through PATH unless absolute
binary = "gzr"

# Seconds to wait for each export before giving up (1-3600)
timeout_secs = 7

# Exports running at the same time (1-32); 1 keeps the manifest order
parallel_exports = 1

# false passes --no-ssl to the export binary
verify_tls = false

# Every failed export command is appended here, one per line
ledger_path = "dodgy_entries.txt"

# Write *** instead of the client secret in the ledger
redact_ledger_secrets = false

# ============================================================================
# Layout
# ============================================================================
[layout]
# Root of the <department>/{look,dashboard} tree
output_root = "Dept_Folders"

# Bad_Jsons_<instance> is created here for soft-deleted content
quarantine_parent = "."

# ============================================================================
# Logging
# ============================================================================
[logging]
# Also write JSON logs to rolling files
local_enabled = false
local_path = "logs"

# daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
