//! Result type alias for gzr-sync

use super::errors::SyncError;

/// Result type alias for gzr-sync operations
///
/// # Examples
///
/// ```
/// use gzr_sync::domain::result::Result;
/// use gzr_sync::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
