//! Post-export integrity sweeps
//!
//! Two passes run over the department tree once all exports are done:
//!
//! 1. [`QuarantineSweep`] moves soft-deleted artifacts out of the tree.
//! 2. [`TitleCleanser`] makes the remaining titles unique.
//!
//! The order matters: a deleted artifact must not claim a title ahead of a
//! live one.

pub mod artifact;
pub mod cleanse;
pub mod quarantine;
pub mod report;

pub use artifact::{artifact_paths, is_artifact, Artifact, DeletionMarker};
pub use cleanse::TitleCleanser;
pub use quarantine::{quarantine_dir_name, QuarantineSweep};
pub use report::{CleanseReport, QuarantinedArtifact, SweepReport, TitleRename};

use crate::domain::Result;

/// Runs the quarantine sweep, then the title cleanse, over one tree
///
/// The quarantine directory is excluded from the cleanse walk. A preview
/// sweep makes the cleanse a preview as well, so nothing on disk changes.
///
/// # Errors
///
/// Returns the first fatal error of either pass; the cleanse does not run
/// when the sweep fails.
pub fn run_integrity_pass(sweep: &QuarantineSweep) -> Result<(SweepReport, CleanseReport)> {
    let sweep_report = sweep.run()?;
    let cleanse_report = TitleCleanser::new()
        .with_preview(sweep.is_preview())
        .cleanse(sweep.root(), Some(sweep.quarantine_dir()))?;
    Ok((sweep_report, cleanse_report))
}
