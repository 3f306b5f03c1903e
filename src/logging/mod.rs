//! Logging and observability
//!
//! Structured logging through `tracing`, plus a few macros that keep the
//! field names of recurring events consistent across modules.
//!
//! # Example
//!
//! ```no_run
//! use gzr_sync::logging::init_logging;
//! use gzr_sync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a failed export invocation
///
/// # Example
///
/// ```no_run
/// use gzr_sync::log_export_failure;
///
/// log_export_failure!("gzr look cat 42 ...", "timed out after 7s");
/// ```
#[macro_export]
macro_rules! log_export_failure {
    ($invocation:expr, $reason:expr) => {
        tracing::error!(
            invocation = %$invocation,
            reason = %$reason,
            "Export failed"
        );
    };
}

/// Log an artifact the integrity sweeps could not process
///
/// # Example
///
/// ```no_run
/// use gzr_sync::log_artifact_skipped;
/// use std::path::Path;
///
/// log_artifact_skipped!(Path::new("Dept_Folders/Sales/look/1.json"), "missing 'title'");
/// ```
#[macro_export]
macro_rules! log_artifact_skipped {
    ($path:expr, $reason:expr) => {
        tracing::warn!(
            path = %$path.display(),
            reason = %$reason,
            "Skipping artifact"
        );
    };
}

/// Log the completion of a pipeline phase
///
/// # Example
///
/// ```no_run
/// use gzr_sync::log_phase_complete;
/// use std::time::Duration;
///
/// log_phase_complete!("quarantine", 12, Duration::from_millis(40));
/// ```
#[macro_export]
macro_rules! log_phase_complete {
    ($phase:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            phase = $phase,
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Phase completed"
        );
    };
}
