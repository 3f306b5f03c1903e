//! Core business logic for gzr-sync.
//!
//! This module contains the orchestration of a sync run.
//!
//! # Modules
//!
//! - [`layout`] - Department folder tree
//! - [`export`] - Export dispatch, failure ledger, and coordination
//! - [`integrity`] - Quarantine sweep and title cleanse
//!
//! # Sync Workflow
//!
//! 1. **Materialize**: Create `<root>/<department>/{look,dashboard}` for every department
//! 2. **Dispatch**: Run one bounded export per valid manifest record
//! 3. **Ledger**: Append every failed invocation to the failure ledger
//! 4. **Quarantine**: Move artifacts with `deleted_at` set into `Bad_Jsons_<instance>`
//! 5. **Cleanse**: Suffix duplicate titles with their space name
//! 6. **Report**: Generate the sync summary
//!
//! # Example
//!
//! ```rust,no_run
//! use gzr_sync::adapters::gzr::ProcessRunner;
//! use gzr_sync::adapters::manifest::Manifest;
//! use gzr_sync::config::{load_config_or_default, load_credentials};
//! use gzr_sync::core::export::SyncCoordinator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default(None)?;
//! let credentials = load_credentials("looker.ini")?;
//! let instance = credentials.resolve_instance(Some("looker.example.com"))?;
//! let manifest = Manifest::from_path("content.csv")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = SyncCoordinator::new(config, Arc::new(ProcessRunner::new()), shutdown_rx);
//!
//! let summary = coordinator.execute_sync(&manifest, credentials, instance).await?;
//! println!("Exported: {}", summary.exported);
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod integrity;
pub mod layout;
