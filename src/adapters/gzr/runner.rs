//! Execution of export invocations
//!
//! [`ExportRunner`] is the seam between the dispatcher and the operating
//! system. [`ProcessRunner`] spawns the real binary; tests plug in their own
//! implementations.

use super::invocation::ExportInvocation;
use crate::domain::errors::ExportFailure;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Longest stderr tail kept in a failure
const STDERR_TAIL_CHARS: usize = 512;

/// Runs one export invocation with a bounded wait
#[async_trait]
pub trait ExportRunner: Send + Sync {
    /// Runs the invocation to completion
    ///
    /// # Errors
    ///
    /// Returns the failure kind when the command times out, exits non-zero,
    /// or cannot be executed.
    async fn run(
        &self,
        invocation: &ExportInvocation,
        timeout: Duration,
    ) -> Result<(), ExportFailure>;
}

/// Spawns the export binary as a child process
///
/// Output is captured rather than inherited. A child still running when the
/// timeout elapses is killed; whatever it already wrote stays on disk.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExportRunner for ProcessRunner {
    async fn run(
        &self,
        invocation: &ExportInvocation,
        timeout: Duration,
    ) -> Result<(), ExportFailure> {
        let child = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExportFailure::Spawn(format!("{}: {e}", invocation.program())))?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ExportFailure::Spawn(e.to_string()))?,
            Err(_) => {
                return Err(ExportFailure::Timeout {
                    seconds: timeout.as_secs(),
                })
            }
        };

        if output.status.success() {
            tracing::trace!(
                stdout = %String::from_utf8_lossy(&output.stdout),
                "Export command output"
            );
            return Ok(());
        }

        Err(ExportFailure::NonZeroExit {
            code: output.status.code(),
            stderr: stderr_tail(&output.stderr),
        })
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let count = text.chars().count();
    if count <= STDERR_TAIL_CHARS {
        return text.to_string();
    }
    text.chars().skip(count - STDERR_TAIL_CHARS).collect()
}
