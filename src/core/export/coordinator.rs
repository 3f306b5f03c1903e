//! Sync coordinator - main orchestrator for a sync run
//!
//! A run goes through four phases, strictly in this order:
//!
//! 1. **Materialize** the department folder tree
//! 2. **Dispatch** one export per valid manifest record
//! 3. **Quarantine** soft-deleted artifacts
//! 4. **Cleanse** duplicate titles
//!
//! A shutdown request during dispatch cancels the records not yet started
//! and skips phases 3 and 4. A dry run previews phases 3 and 4 without
//! touching any artifact.

use crate::adapters::gzr::ExportRunner;
use crate::adapters::manifest::Manifest;
use crate::config::{LookerCredentials, SyncConfig};
use crate::core::export::dispatcher::{DispatchOutcome, DispatchSettings, Dispatcher};
use crate::core::export::ledger::FailureLedger;
use crate::core::export::summary::{FailedExport, SyncSummary};
use crate::core::integrity::{run_integrity_pass, QuarantineSweep};
use crate::core::layout::{distinct_departments, DepartmentLayout};
use crate::domain::errors::SyncError;
use crate::domain::ids::InstanceHost;
use crate::domain::record::SkipReason;
use crate::domain::Result;
use crate::log_phase_complete;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Sync coordinator
pub struct SyncCoordinator {
    config: SyncConfig,
    runner: Arc<dyn ExportRunner>,
    shutdown_signal: watch::Receiver<bool>,
}

impl SyncCoordinator {
    /// Create a new sync coordinator
    pub fn new(
        config: SyncConfig,
        runner: Arc<dyn ExportRunner>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            runner,
            shutdown_signal,
        }
    }

    /// Folder layout under the configured output root
    pub fn layout(&self) -> DepartmentLayout {
        DepartmentLayout::new(&self.config.layout.output_root)
    }

    /// Quarantine sweep for `instance`, a preview when running dry
    pub fn quarantine_sweep(&self, instance: &InstanceHost) -> QuarantineSweep {
        QuarantineSweep::for_instance(
            &self.config.layout.output_root,
            &self.config.layout.quarantine_parent,
            instance,
        )
        .with_preview(self.config.application.dry_run)
    }

    /// Check if shutdown has been requested
    fn is_shutdown_requested(&self) -> bool {
        *self.shutdown_signal.borrow()
    }

    /// Execute the sync
    ///
    /// Per-record export failures end up in the ledger and the summary; they
    /// are never returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error when the folder tree cannot be created or an
    /// integrity pass hits a filesystem failure.
    pub async fn execute_sync(
        &self,
        manifest: &Manifest,
        credentials: LookerCredentials,
        instance: InstanceHost,
    ) -> Result<SyncSummary> {
        let start_time = Instant::now();
        let mut summary = SyncSummary::new();
        summary.total_rows = manifest.len();

        tracing::info!(
            rows = manifest.len(),
            instance = %instance,
            dry_run = self.config.application.dry_run,
            "Starting sync"
        );

        // Phase 1: folders
        let layout = self.layout();
        let series = layout.materialize(manifest.rows())?;
        summary.departments = distinct_departments(&series).len();

        // Phase 2: exports
        let (records, skipped) = manifest.partition();
        for (line, reason) in &skipped {
            match reason {
                SkipReason::MissingId => {
                    tracing::debug!(line = *line, "Skipping row without id")
                }
                other => tracing::warn!(line = *line, reason = %other, "Skipping manifest row"),
            }
        }
        summary.skipped = skipped;
        summary.dispatched = records.len();

        let dispatcher = Dispatcher::new(
            self.runner.clone(),
            Arc::new(FailureLedger::new(&self.config.export.ledger_path)),
            layout,
            DispatchSettings::from_config(
                &self.config.export,
                instance.clone(),
                credentials,
                self.config.application.dry_run,
            ),
        );

        let dispatch_start = Instant::now();
        let dispatcher = &dispatcher;
        let outcomes: Vec<_> = stream::iter(records)
            .map(|record| async move {
                let outcome = if self.is_shutdown_requested() {
                    DispatchOutcome::Cancelled
                } else {
                    dispatcher.dispatch(&record).await
                };
                (record.line, outcome)
            })
            .buffered(self.config.export.parallel_exports)
            .collect()
            .await;

        for (line, outcome) in outcomes {
            match outcome {
                DispatchOutcome::Exported => summary.exported += 1,
                DispatchOutcome::DryRun { .. } => summary.dry_run += 1,
                DispatchOutcome::Cancelled => summary.cancelled += 1,
                DispatchOutcome::Failed {
                    invocation,
                    failure,
                } => summary.failures.push(FailedExport {
                    line,
                    invocation,
                    failure,
                }),
            }
        }
        log_phase_complete!("dispatch", summary.dispatched, dispatch_start.elapsed());

        if summary.cancelled > 0 || self.is_shutdown_requested() {
            tracing::warn!(
                cancelled = summary.cancelled,
                "Shutdown requested, skipping integrity sweeps"
            );
            summary.interrupted = true;
            return Ok(summary.with_duration(start_time.elapsed()));
        }

        // Phases 3 and 4: quarantine, then cleanse
        let sweep = self.quarantine_sweep(&instance);
        let (sweep_report, cleanse_report) =
            tokio::task::spawn_blocking(move || run_integrity_pass(&sweep))
                .await
                .map_err(|e| SyncError::Other(format!("Integrity task failed: {e}")))??;
        summary.sweep = Some(sweep_report);
        summary.cleanse = Some(cleanse_report);

        Ok(summary.with_duration(start_time.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gzr::ExportInvocation;
    use crate::domain::errors::ExportFailure;
    use async_trait::async_trait;
    use std::time::Duration;
    use tempfile::TempDir;

    struct TimeoutRunner;

    #[async_trait]
    impl ExportRunner for TimeoutRunner {
        async fn run(
            &self,
            _invocation: &ExportInvocation,
            timeout: Duration,
        ) -> std::result::Result<(), ExportFailure> {
            Err(ExportFailure::Timeout {
                seconds: timeout.as_secs(),
            })
        }
    }

    fn config(temp: &TempDir) -> SyncConfig {
        let mut config = SyncConfig::default();
        config.layout.output_root = temp.path().join("Dept_Folders");
        config.layout.quarantine_parent = temp.path().to_path_buf();
        config.export.ledger_path = temp.path().join("dodgy_entries.txt");
        config
    }

    const MANIFEST: &str = "\
Type,Title,Department,ID
look,One,Sales,1
dashboard,Two,Ops,
";

    #[tokio::test]
    async fn test_failures_reach_summary_and_ledger() {
        let temp = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);
        let coordinator = SyncCoordinator::new(config(&temp), Arc::new(TimeoutRunner), rx);
        let manifest = Manifest::from_reader(MANIFEST.as_bytes()).unwrap();

        let summary = coordinator
            .execute_sync(
                &manifest,
                LookerCredentials::new("id", "secret"),
                InstanceHost::new("looker.local").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.departments, 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.missing_ids(), 1);
        assert!(summary.sweep.is_some());
        assert!(temp.path().join("Dept_Folders/Ops/dashboard").is_dir());

        let ledger = FailureLedger::read_entries(temp.path().join("dodgy_entries.txt")).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_and_skips_sweeps() {
        let temp = TempDir::new().unwrap();
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let coordinator = SyncCoordinator::new(config(&temp), Arc::new(TimeoutRunner), rx);
        let manifest = Manifest::from_reader(MANIFEST.as_bytes()).unwrap();

        let summary = coordinator
            .execute_sync(
                &manifest,
                LookerCredentials::new("id", "secret"),
                InstanceHost::new("looker.local").unwrap(),
            )
            .await
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.cancelled, 1);
        assert!(summary.sweep.is_none());
        assert!(!temp.path().join("dodgy_entries.txt").exists());
    }

    #[tokio::test]
    async fn test_dry_run_previews_sweeps() {
        let temp = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(false);
        let mut config = config(&temp);
        config.application.dry_run = true;
        let deleted = temp.path().join("Dept_Folders/Sales/look/9.json");
        std::fs::create_dir_all(deleted.parent().unwrap()).unwrap();
        std::fs::write(&deleted, r#"{"title": "Old", "deleted_at": "2024-01-01"}"#).unwrap();

        let coordinator = SyncCoordinator::new(config, Arc::new(TimeoutRunner), rx);
        let manifest = Manifest::from_reader(MANIFEST.as_bytes()).unwrap();
        let summary = coordinator
            .execute_sync(
                &manifest,
                LookerCredentials::new("id", "secret"),
                InstanceHost::new("looker.local").unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(summary.dry_run, 1);
        assert_eq!(summary.sweep.unwrap().quarantined.len(), 1);
        assert!(deleted.exists());
        assert!(!temp.path().join("Bad_Jsons_looker.local").exists());
    }
}
