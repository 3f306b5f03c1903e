//! Domain error types
//!
//! This module defines the error hierarchy for gzr-sync.
//! All errors are domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main gzr-sync error type
///
/// This is the primary error type used throughout the application.
/// Anything that reaches the caller as a `SyncError` aborts the current command;
/// per-record and per-artifact problems are reported through [`ExportFailure`]
/// and [`ArtifactError`] instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credentials file errors
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Manifest (CSV) errors
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Export orchestration errors
    #[error("Export error: {0}")]
    Export(String),

    /// Integrity sweep errors (quarantine, cleanse)
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Failure of a single export invocation
///
/// Never escalated: the dispatcher turns every variant into a ledger entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportFailure {
    /// The command did not finish within the bounded wait
    #[error("timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The command finished with a non-zero status (or was killed by a signal)
    #[error("exited with status {}: {stderr}", describe_status(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// The command could not be started at all
    #[error("failed to start: {0}")]
    Spawn(String),
}

fn describe_status(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

impl ExportFailure {
    /// Whether this failure was caused by the timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExportFailure::Timeout { .. })
    }
}

/// Problem with one exported JSON artifact
///
/// Read, parse and shape problems are logged and skipped by the sweeps;
/// `Write` is the only variant the sweeps treat as fatal.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// File could not be read
    #[error("cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// File is not valid JSON
    #[error("cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A required key is absent
    #[error("{path} has no '{field}' field")]
    MissingField { path: PathBuf, field: &'static str },

    /// A key is present with an unexpected type
    #[error("{path} has an invalid '{field}' field: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },

    /// Rewriting the file failed
    #[error("cannot write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl ArtifactError {
    /// Whether the sweep may log this error and continue with the next file
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ArtifactError::Write { .. })
    }
}

impl From<ArtifactError> for SyncError {
    fn from(err: ArtifactError) -> Self {
        SyncError::Integrity(err.to_string())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv reader errors
impl From<csv::Error> for SyncError {
    fn from(err: csv::Error) -> Self {
        SyncError::Manifest(err.to_string())
    }
}

// Conversion from the INI/credentials loader
impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Credentials(err.to_string())
    }
}
