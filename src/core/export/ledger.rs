//! Failure ledger
//!
//! Plain text, one failed invocation per line, append-only. The file is
//! created by the first failure and opened, appended and closed per entry, so
//! an interrupted run leaves every recorded line intact. Appends from
//! concurrent dispatches are serialized.

use crate::domain::Result;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only record of failed export invocations
#[derive(Debug)]
pub struct FailureLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FailureLedger {
    /// Creates a ledger writing to `path`; nothing touches the disk until
    /// the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Ledger file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry
    ///
    /// Line breaks inside `entry` are flattened to spaces so an entry always
    /// occupies exactly one line.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or written.
    pub async fn append(&self, entry: &str) -> Result<()> {
        let mut line = entry.replace(['\r', '\n'], " ");
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Reads every entry of a ledger file; a missing file has no entries
    pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }
}
