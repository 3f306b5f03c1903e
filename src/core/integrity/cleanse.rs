//! Title cleanse
//!
//! Makes artifact titles unique across the whole tree. Files are visited in
//! a stable order; the first file carrying a title keeps it, every later one
//! is rewritten to `<title>_<space.name>`.

use super::artifact::{artifact_paths, Artifact, DeletionMarker};
use super::report::{CleanseReport, TitleRename};
use crate::domain::Result;
use crate::{log_artifact_skipped, log_phase_complete};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

/// Deduplicates titles for one run
///
/// The set of seen titles lives as long as the cleanser; a fresh cleanser
/// per run means earlier runs never leak into later ones.
///
/// In preview mode no file is written. Soft-deleted artifacts are passed
/// over, since a real run would have quarantined them first.
#[derive(Debug, Default)]
pub struct TitleCleanser {
    seen: BTreeSet<String>,
    preview: bool,
}

impl TitleCleanser {
    /// Create a new cleanser with no seen titles
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches preview mode on or off
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Titles registered so far
    pub fn seen_titles(&self) -> &BTreeSet<String> {
        &self.seen
    }

    /// Cleanses every artifact under `root`, skipping the `exclude` directory
    ///
    /// Files with no title are ignored. Files that cannot be read or parsed,
    /// or that need a rename but lack `space.name`, are logged and left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Failing to rewrite a file aborts the cleanse.
    pub fn cleanse(&mut self, root: &Path, exclude: Option<&Path>) -> Result<CleanseReport> {
        let start = Instant::now();
        let mut report = CleanseReport::default();

        for path in artifact_paths(root, exclude) {
            let artifact = match Artifact::read(&path) {
                Ok(artifact) => artifact,
                Err(e) => {
                    report.scanned += 1;
                    log_artifact_skipped!(path, e);
                    report.skipped += 1;
                    continue;
                }
            };
            if self.preview && artifact.deletion_marker() == DeletionMarker::Deleted {
                continue;
            }
            report.scanned += 1;

            let title = match artifact.title() {
                Ok(Some(title)) => title.to_string(),
                Ok(None) => {
                    report.untitled += 1;
                    continue;
                }
                Err(e) => {
                    log_artifact_skipped!(path, e);
                    report.skipped += 1;
                    continue;
                }
            };

            if self.seen.insert(title.clone()) {
                continue;
            }

            let space = match artifact.space_name() {
                Ok(space) => space,
                Err(e) => {
                    log_artifact_skipped!(path, e);
                    report.skipped += 1;
                    continue;
                }
            };

            let renamed = format!("{title}_{space}");
            let retitled = artifact.retitled(&renamed)?;
            if self.preview {
                tracing::info!(
                    path = %path.display(),
                    from = %title,
                    to = %renamed,
                    "Would rename duplicate title"
                );
            } else {
                retitled.write()?;
                tracing::info!(
                    path = %path.display(),
                    from = %title,
                    to = %renamed,
                    "Renamed duplicate title"
                );
            }

            self.seen.insert(renamed.clone());
            report.renamed.push(TitleRename {
                path,
                from: title,
                to: renamed,
            });
        }

        report.seen_titles = self.seen.clone();
        log_phase_complete!("cleanse", report.renamed.len(), start.elapsed());
        Ok(report)
    }
}
