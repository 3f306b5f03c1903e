// gzr-sync - Looker content export pipeline
// Copyright (c) 2025 gzr-sync Contributors
// Licensed under the MIT License

//! # gzr-sync - Looker content export pipeline
//!
//! gzr-sync drives the `gzr` command-line tool to export Looker looks and
//! dashboards listed in a CSV manifest into a per-department folder tree,
//! then sanitizes what was exported.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Materializing** `<root>/<department>/{look,dashboard}` folders for every department
//! - **Dispatching** one bounded `gzr <type> cat <id>` invocation per manifest record
//! - **Recording** every failed invocation in a plain-text failure ledger
//! - **Quarantining** exported JSON files whose `deleted_at` is set
//! - **Cleansing** duplicate titles by suffixing them with their space name
//!
//! ## Architecture
//!
//! gzr-sync follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (layout, export dispatch, integrity sweeps)
//! - [`adapters`] - External integrations (CSV manifest, gzr process)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration and credentials
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gzr_sync::adapters::gzr::ProcessRunner;
//! use gzr_sync::adapters::manifest::Manifest;
//! use gzr_sync::config::{load_config_or_default, load_credentials};
//! use gzr_sync::core::export::SyncCoordinator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default(None)?;
//!     let credentials = load_credentials("looker.ini")?;
//!     let instance = credentials.resolve_instance(None)?;
//!     let manifest = Manifest::from_path("content.csv")?;
//!
//!     let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!     let coordinator = SyncCoordinator::new(config, Arc::new(ProcessRunner::new()), shutdown);
//!     let summary = coordinator.execute_sync(&manifest, credentials, instance).await?;
//!
//!     println!("Exported {} of {} records", summary.exported, summary.dispatched);
//!     Ok(())
//! }
//! ```
//!
//! ## Sanitizing an existing tree
//!
//! ```rust,no_run
//! use gzr_sync::core::integrity::{run_integrity_pass, QuarantineSweep};
//! use gzr_sync::domain::InstanceHost;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let instance = InstanceHost::new("looker.example.com")?;
//! let sweep = QuarantineSweep::for_instance("Dept_Folders", ".", &instance);
//! let (quarantined, cleansed) = run_integrity_pass(&sweep)?;
//!
//! println!("Quarantined {} files", quarantined.quarantined.len());
//! println!("Renamed {} titles", cleansed.renamed.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Run-level failures use [`domain::SyncError`]. A single failed export is an
//! [`domain::ExportFailure`] and a single unusable JSON file is an
//! [`domain::ArtifactError`]; neither stops the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
