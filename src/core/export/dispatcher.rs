//! Per-record export dispatch
//!
//! The dispatcher turns a [`ManifestRecord`] into an [`ExportInvocation`],
//! runs it through an [`ExportRunner`] with the configured timeout, and
//! records any failure in the [`FailureLedger`]. Failures never propagate:
//! the caller always gets a [`DispatchOutcome`] back and moves on to the next
//! record.

use crate::adapters::gzr::{ExportInvocation, ExportRunner};
use crate::config::{ExportConfig, LookerCredentials};
use crate::core::export::ledger::FailureLedger;
use crate::core::layout::DepartmentLayout;
use crate::domain::errors::ExportFailure;
use crate::domain::ids::InstanceHost;
use crate::domain::record::ManifestRecord;
use crate::log_export_failure;
use std::sync::Arc;
use std::time::Duration;

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The export command finished successfully
    Exported,

    /// The export command failed; `invocation` is the ledger line
    Failed {
        invocation: String,
        failure: ExportFailure,
    },

    /// Dry run: the command was rendered but not executed
    DryRun { invocation: String },

    /// Shutdown was requested before the record was dispatched
    Cancelled,
}

impl DispatchOutcome {
    /// Whether the record ended up in the ledger
    pub fn is_failure(&self) -> bool {
        matches!(self, DispatchOutcome::Failed { .. })
    }
}

/// Fixed inputs shared by every invocation of a run
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Export binary
    pub binary: String,

    /// Target instance
    pub host: InstanceHost,

    /// API credentials
    pub credentials: LookerCredentials,

    /// Bounded wait per invocation
    pub timeout: Duration,

    /// `false` adds `--no-ssl`
    pub verify_tls: bool,

    /// Write `***` instead of the client secret in the ledger
    pub redact_ledger_secrets: bool,

    /// Render invocations without running them
    pub dry_run: bool,
}

impl DispatchSettings {
    /// Settings from the export configuration section
    pub fn from_config(
        config: &ExportConfig,
        host: InstanceHost,
        credentials: LookerCredentials,
        dry_run: bool,
    ) -> Self {
        Self {
            binary: config.binary.clone(),
            host,
            credentials,
            timeout: config.timeout(),
            verify_tls: config.verify_tls,
            redact_ledger_secrets: config.redact_ledger_secrets,
            dry_run,
        }
    }
}

/// Runs export invocations and keeps the failure ledger
pub struct Dispatcher {
    runner: Arc<dyn ExportRunner>,
    ledger: Arc<FailureLedger>,
    layout: DepartmentLayout,
    settings: DispatchSettings,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(
        runner: Arc<dyn ExportRunner>,
        ledger: Arc<FailureLedger>,
        layout: DepartmentLayout,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            runner,
            ledger,
            layout,
            settings,
        }
    }

    /// Ledger receiving the failures
    pub fn ledger(&self) -> &FailureLedger {
        &self.ledger
    }

    /// Builds the invocation for `record`
    ///
    /// The destination is the same directory the materializer created for the
    /// record's department and content type.
    pub fn invocation_for(&self, record: &ManifestRecord) -> ExportInvocation {
        ExportInvocation::new(
            self.settings.binary.clone(),
            record.content_type,
            record.id,
            self.settings.host.clone(),
            self.settings.credentials.client_id.clone(),
            self.settings.credentials.client_secret.clone(),
            self.settings.verify_tls,
            self.layout.content_dir(&record.department, record.content_type),
        )
    }

    /// Dispatches one record
    ///
    /// A failed append to the ledger is logged; it does not stop the run.
    pub async fn dispatch(&self, record: &ManifestRecord) -> DispatchOutcome {
        let invocation = self.invocation_for(record);
        let ledger_line = invocation.render(self.settings.redact_ledger_secrets);

        if self.settings.dry_run {
            tracing::info!(
                line = record.line,
                invocation = %invocation.render(true),
                "Dry run: export not executed"
            );
            return DispatchOutcome::DryRun {
                invocation: ledger_line,
            };
        }

        tracing::debug!(
            line = record.line,
            content_type = %record.content_type,
            id = %record.id,
            "Dispatching export"
        );

        match self.runner.run(&invocation, self.settings.timeout).await {
            Ok(()) => {
                tracing::info!(
                    "Downloaded {} to {}",
                    record.title,
                    invocation.dest_dir().display()
                );
                DispatchOutcome::Exported
            }
            Err(failure) => {
                if let Err(e) = self.ledger.append(&ledger_line).await {
                    tracing::error!(
                        ledger = %self.ledger.path().display(),
                        error = %e,
                        "Failed to append to failure ledger"
                    );
                }
                log_export_failure!(invocation.render(true), failure);
                DispatchOutcome::Failed {
                    invocation: ledger_line,
                    failure,
                }
            }
        }
    }
}
