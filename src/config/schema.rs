//! Configuration schema types
//!
//! This module defines the runtime configuration structure for gzr-sync.
//! Every section has defaults, so an absent file yields a usable config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main gzr-sync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Export invocation settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Output tree layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.export.validate()?;
        self.layout.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (log invocations instead of running them)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Export invocation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export binary, looked up on PATH unless absolute
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Bounded wait per invocation, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of invocations allowed to run at once (1 = sequential)
    #[serde(default = "default_parallel_exports")]
    pub parallel_exports: usize,

    /// Verify the instance's TLS certificate.
    /// When false (the default) `--no-ssl` is passed to every invocation.
    #[serde(default)]
    pub verify_tls: bool,

    /// Failure ledger file, one failed invocation per line
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Write `***` instead of the client secret into ledger lines
    #[serde(default)]
    pub redact_ledger_secrets: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.binary.trim().is_empty() {
            return Err("export.binary cannot be empty".to_string());
        }

        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(format!(
                "export.timeout_secs must be between 1 and 3600, got {}",
                self.timeout_secs
            ));
        }

        if !(1..=32).contains(&self.parallel_exports) {
            return Err(format!(
                "export.parallel_exports must be between 1 and 32, got {}",
                self.parallel_exports
            ));
        }

        if self.ledger_path.as_os_str().is_empty() {
            return Err("export.ledger_path cannot be empty".to_string());
        }

        Ok(())
    }

    /// Bounded wait as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
            parallel_exports: default_parallel_exports(),
            verify_tls: false,
            ledger_path: default_ledger_path(),
            redact_ledger_secrets: false,
        }
    }
}

/// Output tree layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Root of the department tree
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Directory in which `Bad_Jsons_<instance>` is created
    #[serde(default = "default_quarantine_parent")]
    pub quarantine_parent: PathBuf,
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_root.as_os_str().is_empty() {
            return Err("layout.output_root cannot be empty".to_string());
        }
        if self.quarantine_parent.as_os_str().is_empty() {
            return Err("layout.quarantine_parent cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            quarantine_parent: default_quarantine_parent(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_binary() -> String {
    "gzr".to_string()
}

fn default_timeout_secs() -> u64 {
    7
}

fn default_parallel_exports() -> usize {
    1
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("dodgy_entries.txt")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("Dept_Folders")
}

fn default_quarantine_parent() -> PathBuf {
    PathBuf::from(".")
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
            dry_run: false,
        };

        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_validation() {
        let mut config = ExportConfig::default();
        assert!(config.validate().is_ok());

        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.timeout_secs = 10;
        config.parallel_exports = 0;
        assert!(config.validate().is_err());

        config.parallel_exports = 33;
        assert!(config.validate().is_err());

        config.parallel_exports = 4;
        config.binary = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_values() {
        let config = SyncConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.export.binary, "gzr");
        assert_eq!(config.export.timeout(), Duration::from_secs(7));
        assert_eq!(config.export.parallel_exports, 1);
        assert!(!config.export.verify_tls);
        assert_eq!(config.export.ledger_path, PathBuf::from("dodgy_entries.txt"));
        assert_eq!(config.layout.output_root, PathBuf::from("Dept_Folders"));
        assert!(!config.logging.local_enabled);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SyncConfig = toml::from_str(
            r#"
[export]
timeout_secs = 30
"#,
        )
        .unwrap();
        assert_eq!(config.export.timeout_secs, 30);
        assert_eq!(config.export.binary, "gzr");
        assert_eq!(config.layout.output_root, PathBuf::from("Dept_Folders"));
    }
}
