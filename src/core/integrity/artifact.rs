//! Exported JSON artifacts
//!
//! An [`Artifact`] is one JSON file written by the export binary, read once
//! into memory. The sweeps inspect it through typed accessors and, when a
//! change is needed, produce a modified copy and write it back in a single
//! atomic replace.

use crate::domain::errors::ArtifactError;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension the sweeps consider, compared exactly
pub const ARTIFACT_EXTENSION: &str = "json";

const FIELD_DELETED_AT: &str = "deleted_at";
const FIELD_TITLE: &str = "title";
const FIELD_SPACE: &str = "space";
const FIELD_SPACE_NAME: &str = "space.name";

/// State of the `deleted_at` marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionMarker {
    /// `deleted_at` holds a value
    Deleted,

    /// `deleted_at` is null
    Live,

    /// `deleted_at` is absent
    Missing,
}

/// One exported JSON document
#[derive(Debug, Clone)]
pub struct Artifact {
    path: PathBuf,
    document: Value,
}

impl Artifact {
    /// Reads and parses the file at `path`
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Read`] or [`ArtifactError::Parse`].
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, ArtifactError> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path).map_err(|e| ArtifactError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let document = serde_json::from_str(&contents).map_err(|e| ArtifactError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { path, document })
    }

    /// Builds an artifact from an in-memory document
    pub fn from_value(path: impl Into<PathBuf>, document: Value) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    /// File location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed document
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// State of the `deleted_at` marker
    ///
    /// Any non-null value counts as deleted, whatever its type.
    pub fn deletion_marker(&self) -> DeletionMarker {
        match self.document.get(FIELD_DELETED_AT) {
            None => DeletionMarker::Missing,
            Some(Value::Null) => DeletionMarker::Live,
            Some(_) => DeletionMarker::Deleted,
        }
    }

    /// The `title` field; `None` when absent, null or empty
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::InvalidField`] when `title` is not a string.
    pub fn title(&self) -> Result<Option<&str>, ArtifactError> {
        match self.document.get(FIELD_TITLE) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(title)) if title.is_empty() => Ok(None),
            Some(Value::String(title)) => Ok(Some(title.as_str())),
            Some(other) => Err(self.invalid(FIELD_TITLE, other)),
        }
    }

    /// The `space.name` field
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::MissingField`] when `space` or its `name` is
    /// absent, and [`ArtifactError::InvalidField`] when `name` is not a string.
    pub fn space_name(&self) -> Result<&str, ArtifactError> {
        let name = self
            .document
            .get(FIELD_SPACE)
            .and_then(|space| space.get("name"))
            .ok_or_else(|| ArtifactError::MissingField {
                path: self.path.clone(),
                field: FIELD_SPACE_NAME,
            })?;
        match name {
            Value::String(name) => Ok(name.as_str()),
            other => Err(self.invalid(FIELD_SPACE_NAME, other)),
        }
    }

    /// Copy of this artifact with `title` replaced
    ///
    /// Key order of the document is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::InvalidField`] when the document is not a
    /// JSON object.
    pub fn retitled(&self, title: &str) -> Result<Self, ArtifactError> {
        let mut document = self.document.clone();
        let object = document
            .as_object_mut()
            .ok_or_else(|| ArtifactError::InvalidField {
                path: self.path.clone(),
                field: FIELD_TITLE,
                message: "document is not a JSON object".to_string(),
            })?;
        object.insert(FIELD_TITLE.to_string(), Value::String(title.to_string()));
        Ok(Self {
            path: self.path.clone(),
            document,
        })
    }

    /// Replaces the file on disk with this document, pretty-printed
    ///
    /// The new content is written to a temporary file next to the target and
    /// renamed over it, so readers see either the old or the new file. The
    /// replacement carries the permissions of the file it replaces.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Write`] on any filesystem or encoding error.
    pub fn write(&self) -> Result<(), ArtifactError> {
        let write_error = |message: String| ArtifactError::Write {
            path: self.path.clone(),
            message,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut contents =
            serde_json::to_string_pretty(&self.document).map_err(|e| write_error(e.to_string()))?;
        contents.push('\n');

        let mut temp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(e.to_string()))?;
        temp.write_all(contents.as_bytes())
            .map_err(|e| write_error(e.to_string()))?;
        temp.flush().map_err(|e| write_error(e.to_string()))?;
        match fs::metadata(&self.path) {
            Ok(metadata) => temp
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| write_error(e.to_string()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(write_error(e.to_string())),
        }
        temp.persist(&self.path)
            .map_err(|e| write_error(e.error.to_string()))?;
        Ok(())
    }

    fn invalid(&self, field: &'static str, value: &Value) -> ArtifactError {
        ArtifactError::InvalidField {
            path: self.path.clone(),
            field,
            message: format!("expected a string, found {}", json_kind(value)),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Whether `path` has the artifact extension (exact, case-sensitive)
pub fn is_artifact(path: &Path) -> bool {
    path.extension() == Some(OsStr::new(ARTIFACT_EXTENSION))
}

/// Every artifact under `root`, recursively, in a stable order
///
/// Entries are visited sorted by file name at each level. The directory
/// `exclude` (typically the quarantine directory) is not descended into.
/// Unreadable entries are logged and skipped; a missing root yields nothing.
pub fn artifact_paths(root: &Path, exclude: Option<&Path>) -> Vec<PathBuf> {
    let excluded = exclude.and_then(|dir| dir.canonicalize().ok());

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if !entry.file_type().is_dir() {
                return true;
            }
            match &excluded {
                Some(excluded) => entry
                    .path()
                    .canonicalize()
                    .map(|path| &path != excluded)
                    .unwrap_or(true),
                None => true,
            }
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "Cannot walk entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_artifact(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}
