//! Integration tests for folder materialization from a manifest

use gzr_sync::adapters::manifest::Manifest;
use gzr_sync::core::layout::{distinct_departments, DepartmentLayout};
use gzr_sync::domain::{ContentType, Department};
use tempfile::TempDir;
use test_case::test_case;

const MANIFEST: &str = "\
Type,Title,Department,ID
look,A,Sales,1
look,B,Sales,2
dashboard,C,R&D Dept,3
explore,D,Legal,4
look,E,Support ,
dashboard,F,,6
";

#[test]
fn test_every_department_gets_both_folders() {
    let temp = TempDir::new().unwrap();
    let layout = DepartmentLayout::new(temp.path().join("Dept_Folders"));
    let manifest = Manifest::from_reader(MANIFEST.as_bytes()).unwrap();

    let series = layout.materialize(manifest.rows()).unwrap();
    let departments = distinct_departments(&series);

    // Legal (unknown type) and Support (null id) still get folders
    let names: Vec<&str> = departments.iter().map(Department::as_str).collect();
    assert_eq!(names, vec!["Sales", "R&D Dept", "Legal", "Support "]);

    for department in &departments {
        for content_type in ContentType::ALL {
            assert!(layout.content_dir(department, content_type).is_dir());
        }
    }
}

#[test_case("Support ", "Support" ; "trailing whitespace trimmed")]
#[test_case("Sales/EMEA", "Sales_EMEA" ; "separator replaced")]
#[test_case("R&D Dept", "R&D Dept" ; "shell characters kept")]
fn test_department_folder_name(raw: &str, expected: &str) {
    let temp = TempDir::new().unwrap();
    let layout = DepartmentLayout::new(temp.path());
    let department = Department::new(raw).unwrap();

    layout.ensure_department(&department).unwrap();
    assert!(temp.path().join(expected).join("look").is_dir());
    assert!(temp.path().join(expected).join("dashboard").is_dir());
}

#[test]
fn test_materialize_fails_when_root_is_a_file() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Dept_Folders");
    std::fs::write(&root, "not a directory").unwrap();

    let layout = DepartmentLayout::new(&root);
    let manifest = Manifest::from_reader(MANIFEST.as_bytes()).unwrap();
    assert!(layout.materialize(manifest.rows()).is_err());
}
