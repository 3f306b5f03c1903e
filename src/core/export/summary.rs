//! Sync summary and reporting
//!
//! This module defines structures for tracking and reporting the results of
//! one sync run.

use crate::core::integrity::{CleanseReport, SweepReport};
use crate::domain::errors::ExportFailure;
use crate::domain::record::SkipReason;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A failed export, as written to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedExport {
    /// Manifest line of the record
    pub line: usize,

    /// Ledger line
    pub invocation: String,

    /// Why it failed
    pub failure: ExportFailure,
}

/// Summary of a sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Manifest rows read
    pub total_rows: usize,

    /// Distinct department folders ensured
    pub departments: usize,

    /// Records handed to the dispatcher
    pub dispatched: usize,

    /// Successful exports
    pub exported: usize,

    /// Records rendered but not executed (dry run)
    pub dry_run: usize,

    /// Records never dispatched because of a shutdown request
    pub cancelled: usize,

    /// Rows skipped before dispatch, by manifest line
    pub skipped: Vec<(usize, SkipReason)>,

    /// Failed exports, in dispatch order
    pub failures: Vec<FailedExport>,

    /// Quarantine sweep result, if it ran
    pub sweep: Option<SweepReport>,

    /// Title cleanse result, if it ran
    pub cleanse: Option<CleanseReport>,

    /// Whether the run stopped early on a shutdown request
    pub interrupted: bool,

    /// Wall-clock duration
    pub duration: Duration,
}

impl SyncSummary {
    /// Create a new empty summary starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_rows: 0,
            departments: 0,
            dispatched: 0,
            exported: 0,
            dry_run: 0,
            cancelled: 0,
            skipped: Vec::new(),
            failures: Vec::new(),
            sweep: None,
            cleanse: None,
            interrupted: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of failed exports
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Rows skipped because their id was empty or null
    pub fn missing_ids(&self) -> usize {
        self.skipped
            .iter()
            .filter(|(_, reason)| *reason == SkipReason::MissingId)
            .count()
    }

    /// Whether the run completed without failures or interruption
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    /// Get success rate as a percentage of executed exports
    pub fn success_rate(&self) -> f64 {
        let attempted = self.exported + self.failures.len();
        if attempted == 0 {
            return 100.0;
        }
        (self.exported as f64 / attempted as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            total_rows = self.total_rows,
            departments = self.departments,
            dispatched = self.dispatched,
            exported = self.exported,
            failed = self.failures.len(),
            skipped = self.skipped.len(),
            cancelled = self.cancelled,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Sync completed"
        );

        if let Some(sweep) = &self.sweep {
            tracing::info!(
                scanned = sweep.scanned,
                quarantined = sweep.quarantined.len(),
                unmarked = sweep.unmarked,
                skipped = sweep.skipped,
                "Quarantine sweep result"
            );
        }

        if let Some(cleanse) = &self.cleanse {
            tracing::info!(
                scanned = cleanse.scanned,
                renamed = cleanse.renamed.len(),
                skipped = cleanse.skipped,
                "Title cleanse result"
            );
        }

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Sync completed with failed exports"
            );
        }
    }
}

impl Default for SyncSummary {
    fn default() -> Self {
        Self::new()
    }
}
