//! CSV manifest reader
//!
//! The manifest lists what to export. Only four columns are consumed:
//! `Type`, `Title`, `Department` and `ID`; any others are ignored.

use crate::domain::errors::SyncError;
use crate::domain::ids::{ContentId, Department};
use crate::domain::record::{ContentType, ManifestRecord, ManifestRow, SkipReason};
use crate::domain::result::Result;
use std::io::Read;
use std::path::Path;

const COLUMN_TYPE: &str = "Type";
const COLUMN_TITLE: &str = "Title";
const COLUMN_DEPARTMENT: &str = "Department";
const COLUMN_ID: &str = "ID";

/// Parsed manifest, rows in file order
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    rows: Vec<ManifestRow>,
}

struct ColumnIndexes {
    content_type: usize,
    title: usize,
    department: usize,
    id: usize,
}

impl Manifest {
    /// Reads a manifest from a CSV file
    ///
    /// # Errors
    ///
    /// Returns a manifest error when the file is missing, malformed, or lacks
    /// one of the required columns.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            SyncError::Manifest(format!("Cannot open manifest {}: {e}", path.display()))
        })?;
        let manifest = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            rows = manifest.rows.len(),
            "Loaded manifest"
        );

        Ok(manifest)
    }

    /// Reads a manifest from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let columns = ColumnIndexes::locate(&headers)?;

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let cell = |idx: usize| record.get(idx).unwrap_or_default();
            rows.push(parse_row(
                index + 1,
                cell(columns.content_type),
                cell(columns.title),
                cell(columns.department),
                cell(columns.id),
            ));
        }

        Ok(Self { rows })
    }

    /// Builds a manifest from already parsed rows
    pub fn from_rows(rows: Vec<ManifestRow>) -> Self {
        Self { rows }
    }

    /// All rows, including the ones that cannot be dispatched
    pub fn rows(&self) -> &[ManifestRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the manifest has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Splits rows into dispatchable records and skipped rows
    pub fn partition(&self) -> (Vec<ManifestRecord>, Vec<(usize, SkipReason)>) {
        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for row in &self.rows {
            match row.record() {
                Ok(record) => records.push(record),
                Err(reason) => skipped.push((row.line, reason)),
            }
        }
        (records, skipped)
    }
}

impl ColumnIndexes {
    fn locate(headers: &[String]) -> Result<Self> {
        let find = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                SyncError::Manifest(format!(
                    "Missing required column '{name}' (found: {})",
                    headers.join(", ")
                ))
            })
        };

        Ok(Self {
            content_type: find(COLUMN_TYPE)?,
            title: find(COLUMN_TITLE)?,
            department: find(COLUMN_DEPARTMENT)?,
            id: find(COLUMN_ID)?,
        })
    }
}

fn parse_row(line: usize, raw_type: &str, title: &str, department: &str, id: &str) -> ManifestRow {
    let (id, id_error) = match ContentId::from_cell(id) {
        Ok(id) => (id, None),
        Err(e) => (None, Some(e)),
    };

    ManifestRow {
        line,
        content_type: raw_type.parse::<ContentType>().ok(),
        raw_type: raw_type.trim().to_string(),
        title: title.to_string(),
        department: Department::new(department).ok(),
        id,
        id_error,
    }
}
