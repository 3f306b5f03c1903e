//! Department folder layout
//!
//! Every department gets `root/<department>/look/` and
//! `root/<department>/dashboard/`, whether or not it has content of both
//! kinds. [`DepartmentLayout`] is also what the dispatcher asks for
//! destination directories, so the two can never disagree.

use crate::domain::ids::Department;
use crate::domain::record::{ContentType, ManifestRow};
use crate::domain::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Mapping from departments and content types to directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentLayout {
    root: PathBuf,
}

impl DepartmentLayout {
    /// Creates a layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the department tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `root/<department>`
    pub fn department_dir(&self, department: &Department) -> PathBuf {
        self.root.join(department.folder_name())
    }

    /// `root/<department>/<look|dashboard>`
    pub fn content_dir(&self, department: &Department, content_type: ContentType) -> PathBuf {
        self.department_dir(department).join(content_type.folder())
    }

    /// Creates the department directory and both content sub-folders
    ///
    /// Existing directories are left untouched.
    ///
    /// # Errors
    ///
    /// Any filesystem error is returned as is; the run cannot continue without
    /// its destination tree.
    pub fn ensure_department(&self, department: &Department) -> Result<()> {
        for content_type in ContentType::ALL {
            let dir = self.content_dir(department, content_type);
            if !dir.is_dir() {
                fs::create_dir_all(&dir)?;
                tracing::debug!(path = %dir.display(), "Created folder");
            }
        }
        Ok(())
    }

    /// Materializes folders for every distinct department in `rows`
    ///
    /// Returns the per-row department series, in row order (`None` for rows
    /// without a usable department).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gzr_sync::adapters::manifest::Manifest;
    /// use gzr_sync::core::layout::DepartmentLayout;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let manifest = Manifest::from_path("content.csv")?;
    /// let layout = DepartmentLayout::new("Dept_Folders");
    /// let series = layout.materialize(manifest.rows())?;
    /// assert_eq!(series.len(), manifest.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn materialize(&self, rows: &[ManifestRow]) -> Result<Vec<Option<Department>>> {
        let series: Vec<Option<Department>> =
            rows.iter().map(|row| row.department.clone()).collect();

        let mut seen = HashSet::new();
        let mut created = 0usize;
        for department in series.iter().flatten() {
            if seen.insert(department.folder_name()) {
                self.ensure_department(department)?;
                created += 1;
            }
        }

        tracing::info!(
            root = %self.root.display(),
            departments = created,
            "Department folders ready"
        );

        Ok(series)
    }
}

/// Distinct departments of `series`, first occurrence order
pub fn distinct_departments(series: &[Option<Department>]) -> Vec<Department> {
    let mut seen = HashSet::new();
    series
        .iter()
        .flatten()
        .filter(|d| seen.insert(d.folder_name()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(line: usize, department: Option<&str>) -> ManifestRow {
        ManifestRow {
            line,
            content_type: Some(ContentType::Look),
            raw_type: "look".to_string(),
            title: format!("row {line}"),
            department: department.map(|d| Department::new(d).unwrap()),
            id: None,
            id_error: None,
        }
    }

    #[test]
    fn test_content_dir() {
        let layout = DepartmentLayout::new("Dept_Folders");
        let dept = Department::new("R&D Dept ").unwrap();
        assert_eq!(
            layout.content_dir(&dept, ContentType::Dashboard),
            PathBuf::from("Dept_Folders/R&D Dept/dashboard")
        );
    }

    #[test]
    fn test_materialize_creates_both_branches() {
        let temp = TempDir::new().unwrap();
        let layout = DepartmentLayout::new(temp.path().join("out"));
        let rows = vec![row(1, Some("Sales")), row(2, None), row(3, Some("Ops"))];

        let series = layout.materialize(&rows).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series[1].is_none());

        for dept in ["Sales", "Ops"] {
            assert!(temp.path().join("out").join(dept).join("look").is_dir());
            assert!(temp.path().join("out").join(dept).join("dashboard").is_dir());
        }
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let layout = DepartmentLayout::new(temp.path());
        let rows = vec![row(1, Some("Sales"))];

        layout.materialize(&rows).unwrap();
        let marker = temp.path().join("Sales/look/keep.json");
        fs::write(&marker, "{}").unwrap();

        layout.materialize(&rows).unwrap();
        assert!(marker.exists());
    }

    #[test]
    fn test_distinct_departments_keeps_order() {
        let series = vec![
            Some(Department::new("B").unwrap()),
            None,
            Some(Department::new("A").unwrap()),
            Some(Department::new("B ").unwrap()),
        ];
        let distinct = distinct_departments(&series);
        let names: Vec<&str> = distinct.iter().map(|d| d.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
