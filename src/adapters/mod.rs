//! External collaborators of the export pipeline.
//!
//! - [`manifest`] - CSV manifest reader producing typed rows
//! - [`gzr`] - export invocation construction and process execution
//!
//! # Design Pattern
//!
//! Adapters isolate what the core cannot control. The export binary sits
//! behind the [`gzr::ExportRunner`] trait so the dispatcher can be tested
//! with runners that time out, fail, or write fixture files.
//!
//! ```rust,no_run
//! use gzr_sync::adapters::manifest::Manifest;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = Manifest::from_path("content.csv")?;
//! let (records, skipped) = manifest.partition();
//! println!("{} to export, {} skipped", records.len(), skipped.len());
//! # Ok(())
//! # }
//! ```

pub mod gzr;
pub mod manifest;
