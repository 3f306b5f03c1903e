//! Integrity sweep reports

use std::collections::BTreeSet;
use std::path::PathBuf;

/// An artifact moved into quarantine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantinedArtifact {
    /// Original location
    pub from: PathBuf,

    /// Location inside the quarantine directory
    pub to: PathBuf,
}

/// Result of a quarantine sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// JSON files examined
    pub scanned: usize,

    /// Files moved (or, in preview, due to move), in walk order
    pub quarantined: Vec<QuarantinedArtifact>,

    /// Valid artifacts without a `deleted_at` field, left in place
    pub unmarked: usize,

    /// Files that could not be read or parsed
    pub skipped: usize,
}

/// A title rewritten by the cleanse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRename {
    /// Rewritten file
    pub path: PathBuf,

    /// Title before
    pub from: String,

    /// Title after
    pub to: String,
}

/// Result of a title cleanse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanseReport {
    /// JSON files examined
    pub scanned: usize,

    /// Files with an empty or absent title
    pub untitled: usize,

    /// Files rewritten (or, in preview, due to be), in walk order
    pub renamed: Vec<TitleRename>,

    /// Files that could not be read or parsed, or lacked `space.name`
    pub skipped: usize,

    /// Every title registered during the run
    pub seen_titles: BTreeSet<String>,
}

impl CleanseReport {
    /// Whether any file was rewritten
    pub fn changed(&self) -> bool {
        !self.renamed.is_empty()
    }
}
