//! Manifest rows and the records the dispatcher consumes

use super::ids::{ContentId, Department};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content exported by gzr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Saved query
    Look,
    /// Dashboard
    Dashboard,
}

impl ContentType {
    /// Every content type, in folder creation order
    pub const ALL: [ContentType; 2] = [ContentType::Look, ContentType::Dashboard];

    /// Word passed to gzr as the first argument (`gzr look cat ...`)
    pub fn command_word(&self) -> &'static str {
        match self {
            ContentType::Look => "look",
            ContentType::Dashboard => "dashboard",
        }
    }

    /// Name of the per-department sub-folder holding this content type
    pub fn folder(&self) -> &'static str {
        self.command_word()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Look => write!(f, "Look"),
            ContentType::Dashboard => write!(f, "Dashboard"),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    /// Accepts `look`, `looks`, `dashboard` and `dashboards` in any letter case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.strip_suffix('s').unwrap_or(&normalized) {
            "look" => Ok(ContentType::Look),
            "dashboard" => Ok(ContentType::Dashboard),
            _ => Err(format!("Unrecognized content type '{}'", s.trim())),
        }
    }
}

/// Why a manifest row was not dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The ID cell is null
    MissingId,
    /// The ID cell is not numeric
    InvalidId(String),
    /// The Type cell is not a known spelling
    UnknownType(String),
    /// The Department cell is empty or unusable
    MissingDepartment,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingId => write!(f, "missing id"),
            SkipReason::InvalidId(msg) => write!(f, "invalid id: {msg}"),
            SkipReason::UnknownType(raw) => write!(f, "unknown content type '{raw}'"),
            SkipReason::MissingDepartment => write!(f, "missing department"),
        }
    }
}

/// One row of the manifest, with every consumed cell already parsed
///
/// Rows are kept even when they cannot be dispatched: their department still
/// takes part in folder materialization.
#[derive(Debug, Clone)]
pub struct ManifestRow {
    /// 1-based data line number (header excluded)
    pub line: usize,
    /// Parsed content type, `None` when the spelling was not recognised
    pub content_type: Option<ContentType>,
    /// Type cell as written
    pub raw_type: String,
    /// Display title, only used for logging
    pub title: String,
    /// Department, `None` when blank or unusable
    pub department: Option<Department>,
    /// Content id, `None` when the cell is null or invalid
    pub id: Option<ContentId>,
    /// Parse error for a non-null but invalid id cell
    pub id_error: Option<String>,
}

impl ManifestRow {
    /// Converts the row into a dispatchable record
    ///
    /// Checks run in source order: a null id wins over every other problem,
    /// so such rows stay silent no matter what else is wrong with them.
    pub fn record(&self) -> Result<ManifestRecord, SkipReason> {
        if let Some(err) = &self.id_error {
            return Err(SkipReason::InvalidId(err.clone()));
        }
        let id = self.id.ok_or(SkipReason::MissingId)?;
        let department = self
            .department
            .clone()
            .ok_or(SkipReason::MissingDepartment)?;
        let content_type = self
            .content_type
            .ok_or_else(|| SkipReason::UnknownType(self.raw_type.clone()))?;

        Ok(ManifestRecord {
            line: self.line,
            content_type,
            title: self.title.clone(),
            department,
            id,
        })
    }
}

/// A manifest row that can be exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// 1-based data line number
    pub line: usize,
    /// Canonical content type
    pub content_type: ContentType,
    /// Display title
    pub title: String,
    /// Destination department
    pub department: Department,
    /// Content id
    pub id: ContentId,
}
