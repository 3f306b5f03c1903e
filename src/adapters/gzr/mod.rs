//! gzr (Looker content export CLI) integration
//!
//! - [`ExportInvocation`] - argument vector and ledger rendering for one export
//! - [`ExportRunner`] - async execution seam with a bounded wait
//! - [`ProcessRunner`] - production runner backed by `tokio::process`

pub mod invocation;
pub mod runner;

pub use invocation::{shell_escape, ExportInvocation};
pub use runner::{ExportRunner, ProcessRunner};
