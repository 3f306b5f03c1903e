//! Integration tests for configuration and credentials loading
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX to avoid
//! interference between tests.

use gzr_sync::config::{load_config, load_credentials};
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("GZR_SYNC_APPLICATION_LOG_LEVEL");
    std::env::remove_var("GZR_SYNC_APPLICATION_DRY_RUN");
    std::env::remove_var("GZR_SYNC_EXPORT_TIMEOUT_SECS");
    std::env::remove_var("GZR_SYNC_EXPORT_PARALLEL_EXPORTS");
    std::env::remove_var("GZR_SYNC_LAYOUT_OUTPUT_ROOT");
    std::env::remove_var("TEST_GZR_BINARY");
}

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = toml_file(
        r#"
[application]
log_level = "debug"
dry_run = true

[export]
binary = "/opt/gzr/bin/gzr"
timeout_secs = 30
parallel_exports = 4
verify_tls = true
ledger_path = "out/failed.txt"
redact_ledger_secrets = true

[layout]
output_root = "Exports"
quarantine_parent = "out"

[logging]
local_enabled = false
local_path = "/tmp/gzr-sync"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.export.binary, "/opt/gzr/bin/gzr");
    assert_eq!(config.export.timeout_secs, 30);
    assert_eq!(config.export.parallel_exports, 4);
    assert!(config.export.verify_tls);
    assert_eq!(config.export.ledger_path, PathBuf::from("out/failed.txt"));
    assert!(config.export.redact_ledger_secrets);
    assert_eq!(config.layout.output_root, PathBuf::from("Exports"));
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_defaults_match_documented_values() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = load_config(toml_file("").path()).unwrap();
    assert_eq!(config.export.binary, "gzr");
    assert_eq!(config.export.timeout_secs, 7);
    assert_eq!(config.export.parallel_exports, 1);
    assert!(!config.export.verify_tls);
    assert_eq!(
        config.export.ledger_path,
        PathBuf::from("dodgy_entries.txt")
    );
    assert!(!config.export.redact_ledger_secrets);
    assert_eq!(config.layout.output_root, PathBuf::from("Dept_Folders"));
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_GZR_BINARY", "/usr/local/bin/gzr");

    let file = toml_file("[export]\nbinary = \"${TEST_GZR_BINARY}\"\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.export.binary, "/usr/local/bin/gzr");

    cleanup_env_vars();
}

#[test]
fn test_env_var_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("GZR_SYNC_EXPORT_TIMEOUT_SECS", "12");
    std::env::set_var("GZR_SYNC_LAYOUT_OUTPUT_ROOT", "/data/looker");
    std::env::set_var("GZR_SYNC_APPLICATION_DRY_RUN", "true");

    let file = toml_file("[export]\ntimeout_secs = 7\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.export.timeout_secs, 12);
    assert_eq!(config.layout.output_root, PathBuf::from("/data/looker"));
    assert!(config.application.dry_run);

    cleanup_env_vars();
}

#[test]
fn test_env_override_failing_validation() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("GZR_SYNC_EXPORT_PARALLEL_EXPORTS", "64");

    let result = load_config(toml_file("").path());
    assert!(result.is_err());

    cleanup_env_vars();
}

#[test]
fn test_invalid_toml() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let result = load_config(toml_file("[export\ntimeout_secs = ").path());
    assert!(result.is_err());
}

#[test]
fn test_load_credentials_ini() {
    let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
    file.write_all(
        b"[main]\nbase_url=https://10.20.30.40:19999\nclient_id=my-id\nclient_secret=my-secret\nverify_ssl=False\n",
    )
    .unwrap();
    file.flush().unwrap();

    let credentials = load_credentials(file.path()).unwrap();
    assert_eq!(credentials.client_id, "my-id");
    assert_eq!(credentials.client_secret.expose_secret(), "my-secret");
    assert_eq!(
        credentials.resolve_instance(None).unwrap().as_str(),
        "10.20.30.40"
    );
    assert_eq!(
        credentials
            .resolve_instance(Some("looker.internal"))
            .unwrap()
            .as_str(),
        "looker.internal"
    );
}
