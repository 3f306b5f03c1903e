//! Quarantine sweep
//!
//! Moves every artifact whose `deleted_at` is set out of the department tree
//! into `Bad_Jsons_<instance>`. Live artifacts are never modified.

use super::artifact::{artifact_paths, Artifact, DeletionMarker};
use super::report::{QuarantinedArtifact, SweepReport};
use crate::domain::errors::SyncError;
use crate::domain::ids::InstanceHost;
use crate::domain::Result;
use crate::{log_artifact_skipped, log_phase_complete};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Quarantine directory name for an instance
pub fn quarantine_dir_name(instance: &InstanceHost) -> String {
    format!("Bad_Jsons_{instance}")
}

/// Moves soft-deleted artifacts into a quarantine directory
///
/// In preview mode the sweep reports where each file would go and touches
/// nothing.
#[derive(Debug, Clone)]
pub struct QuarantineSweep {
    root: PathBuf,
    quarantine_dir: PathBuf,
    preview: bool,
}

impl QuarantineSweep {
    /// Sweep of `root` into `quarantine_dir`
    pub fn new(root: impl Into<PathBuf>, quarantine_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            quarantine_dir: quarantine_dir.into(),
            preview: false,
        }
    }

    /// Switches preview mode on or off
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Whether this sweep only reports
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Sweep of `root` into `<parent>/Bad_Jsons_<instance>`
    pub fn for_instance(
        root: impl Into<PathBuf>,
        parent: impl AsRef<Path>,
        instance: &InstanceHost,
    ) -> Self {
        Self::new(root, parent.as_ref().join(quarantine_dir_name(instance)))
    }

    /// Root being swept
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination of quarantined files
    pub fn quarantine_dir(&self) -> &Path {
        &self.quarantine_dir
    }

    /// Runs the sweep
    ///
    /// Unreadable, unparsable and marker-less files are logged and left in
    /// place. The quarantine directory is created on the first move, never
    /// in preview.
    ///
    /// # Errors
    ///
    /// Failing to create the quarantine directory or to move a file aborts
    /// the sweep.
    pub fn run(&self) -> Result<SweepReport> {
        let start = Instant::now();
        let mut report = SweepReport::default();
        let mut planned = HashSet::new();

        for path in artifact_paths(&self.root, Some(&self.quarantine_dir)) {
            report.scanned += 1;

            let artifact = match Artifact::read(&path) {
                Ok(artifact) => artifact,
                Err(e) => {
                    log_artifact_skipped!(path, e);
                    report.skipped += 1;
                    continue;
                }
            };

            match artifact.deletion_marker() {
                DeletionMarker::Live => {}
                DeletionMarker::Missing => {
                    tracing::debug!(path = %path.display(), "No 'deleted_at' field");
                    report.unmarked += 1;
                }
                DeletionMarker::Deleted => {
                    let to = self.unique_target(&path, &planned)?;
                    if self.preview {
                        tracing::info!(
                            from = %path.display(),
                            to = %to.display(),
                            "Would quarantine deleted artifact"
                        );
                    } else {
                        self.quarantine(&path, &to)?;
                        tracing::info!(
                            from = %path.display(),
                            to = %to.display(),
                            "Quarantined deleted artifact"
                        );
                    }
                    planned.insert(to.clone());
                    report.quarantined.push(QuarantinedArtifact { from: path, to });
                }
            }
        }

        log_phase_complete!("quarantine", report.quarantined.len(), start.elapsed());
        Ok(report)
    }

    fn quarantine(&self, path: &Path, target: &Path) -> Result<()> {
        fs::create_dir_all(&self.quarantine_dir).map_err(|e| {
            SyncError::Integrity(format!(
                "Cannot create quarantine directory {}: {e}",
                self.quarantine_dir.display()
            ))
        })?;

        move_file(path, target).map_err(|e| {
            SyncError::Integrity(format!(
                "Cannot move {} to {}: {e}",
                path.display(),
                target.display()
            ))
        })
    }

    // A file of the same name already in quarantine, or already claimed by
    // this run, is never overwritten
    fn unique_target(&self, path: &Path, planned: &HashSet<PathBuf>) -> Result<PathBuf> {
        let file_name = path.file_name().ok_or_else(|| {
            SyncError::Integrity(format!("{} has no file name", path.display()))
        })?;
        let free = |candidate: &PathBuf| !candidate.exists() && !planned.contains(candidate);
        let candidate = self.quarantine_dir.join(file_name);
        if free(&candidate) {
            return Ok(candidate);
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut counter = 1usize;
        loop {
            let candidate = self
                .quarantine_dir
                .join(format!("{stem}_{counter}{extension}"));
            if free(&candidate) {
                return Ok(candidate);
            }
            counter += 1;
        }
    }
}

// rename fails across filesystems; fall back to copy then remove
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if fs::copy(from, to).is_err() {
                return Err(rename_err);
            }
            fs::remove_file(from)
        }
    }
}
