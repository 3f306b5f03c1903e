//! Export dispatch and coordination
//!
//! This module provides the export side of a sync run:
//! - Per-record dispatch of export invocations
//! - The failure ledger
//! - Run coordination and summary reporting

pub mod coordinator;
pub mod dispatcher;
pub mod ledger;
pub mod summary;

pub use coordinator::SyncCoordinator;
pub use dispatcher::{DispatchOutcome, DispatchSettings, Dispatcher};
pub use ledger::FailureLedger;
pub use summary::{FailedExport, SyncSummary};
