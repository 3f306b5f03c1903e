//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SyncConfig;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Default runtime configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "gzr-sync.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SyncConfig
/// 4. Applies environment variable overrides (GZR_SYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use gzr_sync::config::loader::load_config;
///
/// let config = load_config("gzr-sync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: SyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finalize(config)
}

/// Loads the configuration named on the command line, or the defaults
///
/// An explicitly named file must exist. Without one, [`DEFAULT_CONFIG_FILE`]
/// is used when present in the working directory and built-in defaults otherwise.
/// Environment overrides and validation apply in every case.
pub fn load_config_or_default(path: Option<&str>) -> Result<SyncConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
        None => {
            tracing::debug!("No configuration file, using defaults");
            finalize(SyncConfig::default())
        }
    }
}

fn finalize(mut config: SyncConfig) -> Result<SyncConfig> {
    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SyncError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using GZR_SYNC_* prefix
///
/// Environment variables follow the pattern: GZR_SYNC_<SECTION>_<KEY>,
/// for example GZR_SYNC_EXPORT_TIMEOUT_SECS. Unparseable numbers are ignored.
fn apply_env_overrides(config: &mut SyncConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("GZR_SYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("GZR_SYNC_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Export overrides
    if let Ok(val) = std::env::var("GZR_SYNC_EXPORT_BINARY") {
        config.export.binary = val;
    }
    if let Ok(val) = std::env::var("GZR_SYNC_EXPORT_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.export.timeout_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("GZR_SYNC_EXPORT_PARALLEL_EXPORTS") {
        if let Ok(parallel) = val.parse() {
            config.export.parallel_exports = parallel;
        }
    }
    if let Ok(val) = std::env::var("GZR_SYNC_EXPORT_VERIFY_TLS") {
        config.export.verify_tls = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("GZR_SYNC_EXPORT_LEDGER_PATH") {
        config.export.ledger_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("GZR_SYNC_EXPORT_REDACT_LEDGER_SECRETS") {
        config.export.redact_ledger_secrets = val.parse().unwrap_or(false);
    }

    // Layout overrides
    if let Ok(val) = std::env::var("GZR_SYNC_LAYOUT_OUTPUT_ROOT") {
        config.layout.output_root = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("GZR_SYNC_LAYOUT_QUARANTINE_PARENT") {
        config.layout.quarantine_parent = PathBuf::from(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("GZR_SYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("GZR_SYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
