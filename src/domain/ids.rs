//! Domain identifier types with validation
//!
//! Newtype wrappers for the values a manifest row and a target instance carry.
//! Each type validates on construction so the rest of the crate never has to
//! re-check emptiness or numeric coercion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Department name, the grouping key of the output tree
///
/// The raw manifest value is kept for logging; [`Department::folder_name`]
/// is the single mapping from department to directory name.
///
/// # Examples
///
/// ```
/// use gzr_sync::domain::ids::Department;
///
/// let dept = Department::new("R&D Dept  ").unwrap();
/// assert_eq!(dept.as_str(), "R&D Dept  ");
/// assert_eq!(dept.folder_name(), "R&D Dept");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Department(String);

impl Department {
    /// Creates a new Department from a string
    ///
    /// # Returns
    ///
    /// Returns `Err` if the value is blank, or would resolve to `.` or `..`
    /// once trailing whitespace is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let trimmed = name.trim_end();
        if trimmed.trim_start().is_empty() {
            return Err("Department cannot be empty".to_string());
        }
        if trimmed == "." || trimmed == ".." {
            return Err(format!("Department '{trimmed}' is not a valid folder name"));
        }
        if name.contains('\0') {
            return Err("Department cannot contain NUL characters".to_string());
        }
        Ok(Self(name))
    }

    /// Returns the department as given in the manifest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory name for this department
    ///
    /// Trailing whitespace is trimmed and path separators become `_`, so the
    /// department always maps to exactly one directory directly under the root.
    pub fn folder_name(&self) -> String {
        self.0
            .trim_end()
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Numeric content identifier (look or dashboard id)
///
/// Tabular sources frequently hand integers back as floats (`42.0`), so
/// [`ContentId::from_cell`] coerces them to integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId(u64);

impl ContentId {
    /// Creates a new ContentId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Parses a manifest cell
    ///
    /// Returns `Ok(None)` for a null cell (empty, `nan`, `null`, `none`),
    /// `Ok(Some(_))` for integral or float values (fraction truncated), and
    /// `Err` for anything else, including negative numbers.
    ///
    /// # Examples
    ///
    /// ```
    /// use gzr_sync::domain::ids::ContentId;
    ///
    /// assert_eq!(ContentId::from_cell("42.0").unwrap().unwrap().get(), 42);
    /// assert!(ContentId::from_cell("").unwrap().is_none());
    /// assert!(ContentId::from_cell("abc").is_err());
    /// ```
    pub fn from_cell(cell: &str) -> Result<Option<Self>, String> {
        let cell = cell.trim();
        if cell.is_empty() || ["nan", "null", "none", "na"].contains(&cell.to_lowercase().as_str())
        {
            return Ok(None);
        }

        if let Ok(id) = cell.parse::<u64>() {
            return Ok(Some(Self(id)));
        }

        match cell.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 && value < u64::MAX as f64 => {
                Ok(Some(Self(value.trunc() as u64)))
            }
            _ => Err(format!("'{cell}' is not a valid content id")),
        }
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ContentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Target instance (IP or hostname) content is exported from
///
/// Also names the quarantine directory, so it is kept free of path separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceHost(String);

impl InstanceHost {
    /// Creates a new InstanceHost from a string
    pub fn new(host: impl Into<String>) -> Result<Self, String> {
        let host = host.into().trim().to_string();
        if host.is_empty() {
            return Err("Instance host cannot be empty".to_string());
        }
        if host.contains('/') || host.contains('\\') || host.contains(char::is_whitespace) {
            return Err(format!(
                "Instance host '{host}' must be a bare hostname or IP address"
            ));
        }
        Ok(Self(host))
    }

    /// Derives the host from a base URL such as `https://looker.example.com:19999`
    ///
    /// # Examples
    ///
    /// ```
    /// use gzr_sync::domain::ids::InstanceHost;
    ///
    /// let host = InstanceHost::from_base_url("https://looker.example.com:19999/api").unwrap();
    /// assert_eq!(host.as_str(), "looker.example.com");
    /// ```
    pub fn from_base_url(base_url: &str) -> Result<Self, String> {
        let without_scheme = base_url
            .split_once("://")
            .map_or(base_url, |(_, rest)| rest);
        let authority = without_scheme.split('/').next().unwrap_or_default();
        let authority = authority.rsplit('@').next().unwrap_or_default();
        let host = if authority.starts_with('[') {
            // bracketed IPv6 literal, keep the brackets off
            authority
                .trim_start_matches('[')
                .split(']')
                .next()
                .unwrap_or_default()
        } else {
            authority.split(':').next().unwrap_or_default()
        };
        Self::new(host).map_err(|e| format!("Cannot derive host from '{base_url}': {e}"))
    }

    /// Returns the host as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceHost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_rejects_blank() {
        assert!(Department::new("").is_err());
        assert!(Department::new("   ").is_err());
        assert!(Department::new("..").is_err());
        assert!(Department::new(". ").is_err());
    }

    #[test]
    fn test_department_folder_name() {
        let dept = Department::new("Sales / EMEA ").unwrap();
        assert_eq!(dept.folder_name(), "Sales _ EMEA");

        let dept = Department::new("  Finance").unwrap();
        assert_eq!(dept.folder_name(), "  Finance");
    }

    #[test]
    fn test_department_same_string_same_folder() {
        let a = Department::new("R&D Dept").unwrap();
        let b = Department::new("R&D Dept").unwrap();
        assert_eq!(a.folder_name(), b.folder_name());
    }

    #[test]
    fn test_content_id_from_cell() {
        assert_eq!(ContentId::from_cell("7").unwrap(), Some(ContentId::new(7)));
        assert_eq!(ContentId::from_cell(" 12.0 ").unwrap(), Some(ContentId::new(12)));
        assert_eq!(ContentId::from_cell("12.9").unwrap(), Some(ContentId::new(12)));
        assert_eq!(ContentId::from_cell("NaN").unwrap(), None);
        assert_eq!(ContentId::from_cell("").unwrap(), None);
        assert!(ContentId::from_cell("-3").is_err());
        assert!(ContentId::from_cell("twelve").is_err());
    }

    #[test]
    fn test_instance_host_validation() {
        assert!(InstanceHost::new("10.0.0.5").is_ok());
        assert!(InstanceHost::new("").is_err());
        assert!(InstanceHost::new("a/b").is_err());
        assert!(InstanceHost::new("two words").is_err());
    }

    #[test]
    fn test_instance_host_from_base_url() {
        let host = InstanceHost::from_base_url("https://looker.example.com:19999").unwrap();
        assert_eq!(host.as_str(), "looker.example.com");

        let host = InstanceHost::from_base_url("looker.internal").unwrap();
        assert_eq!(host.as_str(), "looker.internal");

        let host = InstanceHost::from_base_url("https://[::1]:19999/api/4.0").unwrap();
        assert_eq!(host.as_str(), "::1");

        assert!(InstanceHost::from_base_url("https://").is_err());
    }
}
