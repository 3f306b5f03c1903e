//! Configuration management for gzr-sync.
//!
//! Two inputs are handled here:
//! - the optional TOML runtime configuration ([`SyncConfig`]), and
//! - the INI credentials file read by the export binary's users ([`LookerCredentials`]).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gzr_sync::config::{load_config_or_default, load_credentials};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default(None)?;
//! let credentials = load_credentials("looker.ini")?;
//!
//! println!("Export binary: {}", config.export.binary);
//! println!("Client id: {}", credentials.client_id);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [export]
//! binary = "gzr"
//! timeout_secs = 7
//! parallel_exports = 1
//! ledger_path = "dodgy_entries.txt"
//!
//! [layout]
//! output_root = "Dept_Folders"
//! quarantine_parent = "."
//! ```
//!
//! # Environment Variables
//!
//! `${VAR_NAME}` placeholders are substituted before parsing, and any
//! `GZR_SYNC_<SECTION>_<KEY>` variable overrides the file:
//!
//! ```bash
//! export GZR_SYNC_EXPORT_TIMEOUT_SECS=10
//! export GZR_SYNC_LAYOUT_OUTPUT_ROOT=/data/looker
//! ```

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use credentials::{load_credentials, LookerCredentials};
pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_FILE};
pub use schema::{ApplicationConfig, ExportConfig, LayoutConfig, LoggingConfig, SyncConfig};
pub use secret::{secret_string, SecretString, SecretValue};
