//! Domain models and types for gzr-sync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`Department`], [`ContentId`], [`InstanceHost`])
//! - **Manifest models** ([`ManifestRow`], [`ManifestRecord`], [`ContentType`])
//! - **Error types** ([`SyncError`], [`ExportFailure`], [`ArtifactError`])
//! - **Result type alias** ([`Result`])
//!
//! # Content types
//!
//! Manifest spellings are parsed once, at the loading boundary, into a closed enum:
//!
//! ```rust
//! use gzr_sync::domain::ContentType;
//!
//! let ct: ContentType = "dashboards".parse().unwrap();
//! assert_eq!(ct, ContentType::Dashboard);
//! assert_eq!(ct.folder(), "dashboard");
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ArtifactError, ExportFailure, SyncError};
pub use ids::{ContentId, Department, InstanceHost};
pub use record::{ContentType, ManifestRecord, ManifestRow, SkipReason};
pub use result::Result;
