//! Integration tests for the quarantine sweep and the title cleanse

use gzr_sync::core::integrity::{run_integrity_pass, Artifact, QuarantineSweep, TitleCleanser};
use gzr_sync::domain::InstanceHost;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn title_of(path: &Path) -> Option<String> {
    Artifact::read(path)
        .unwrap()
        .title()
        .unwrap()
        .map(str::to_string)
}

#[test]
fn test_only_deleted_artifacts_are_quarantined() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Dept_Folders");
    let live_null = r#"{"id": 1, "title": "Alive", "deleted_at": null}"#;
    let live_absent = r#"{"id": 2, "title": "Also alive"}"#;
    write(&root, "Sales/look/1.json", live_null);
    write(&root, "Sales/dashboard/2.json", live_absent);
    write(&root, "Ops/look/3.json", r#"{"id": 3, "deleted_at": "2024-02-01T10:00:00Z"}"#);
    write(&root, "Ops/dashboard/4.json", r#"{"id": 4, "deleted_at": "2023-11-30T08:15:00Z"}"#);

    let instance = InstanceHost::new("looker.example.com").unwrap();
    let sweep = QuarantineSweep::for_instance(&root, temp.path(), &instance);
    let report = sweep.run().unwrap();

    let quarantine = temp.path().join("Bad_Jsons_looker.example.com");
    assert_eq!(report.quarantined.len(), 2);
    assert_eq!(report.unmarked, 1);
    assert_eq!(report.skipped, 0);
    assert!(quarantine.join("3.json").exists());
    assert!(quarantine.join("4.json").exists());
    assert_eq!(fs::read_dir(&quarantine).unwrap().count(), 2);

    assert_eq!(
        fs::read_to_string(root.join("Sales/look/1.json")).unwrap(),
        live_null
    );
    assert_eq!(
        fs::read_to_string(root.join("Sales/dashboard/2.json")).unwrap(),
        live_absent
    );
}

#[test]
fn test_duplicate_titles_get_space_suffix_in_walk_order() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "a_east/look/1.json", r#"{"title": "Sales Report", "space": {"name": "East"}}"#);
    write(root, "b_west/look/2.json", r#"{"title": "Sales Report", "space": {"name": "West"}}"#);
    write(root, "c_north/look/3.json", r#"{"title": "Sales Report", "space": {"name": "North"}}"#);

    let mut cleanser = TitleCleanser::new();
    let report = cleanser.cleanse(root, None).unwrap();

    assert_eq!(
        title_of(&root.join("a_east/look/1.json")).as_deref(),
        Some("Sales Report")
    );
    assert_eq!(
        title_of(&root.join("b_west/look/2.json")).as_deref(),
        Some("Sales Report_West")
    );
    assert_eq!(
        title_of(&root.join("c_north/look/3.json")).as_deref(),
        Some("Sales Report_North")
    );
    assert_eq!(report.renamed.len(), 2);
    assert_eq!(cleanser.seen_titles().len(), 3);
}

#[test]
fn test_cleanse_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "a/1.json", r#"{"title": "Ops", "space": {"name": "A"}}"#);
    write(root, "b/2.json", r#"{"title": "Ops", "space": {"name": "B"}}"#);
    write(root, "c/3.json", r#"{"title": "", "space": {"name": "C"}}"#);

    let first = TitleCleanser::new().cleanse(root, None).unwrap();
    assert!(first.changed());

    let snapshot: Vec<String> = ["a/1.json", "b/2.json", "c/3.json"]
        .iter()
        .map(|p| fs::read_to_string(root.join(p)).unwrap())
        .collect();

    let second = TitleCleanser::new().cleanse(root, None).unwrap();
    assert!(!second.changed());

    let after: Vec<String> = ["a/1.json", "b/2.json", "c/3.json"]
        .iter()
        .map(|p| fs::read_to_string(root.join(p)).unwrap())
        .collect();
    assert_eq!(snapshot, after);
}

#[test]
fn test_malformed_artifacts_do_not_abort_the_walk() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "a/broken.json", "{\"title\": ");
    write(root, "b/1.json", r#"{"title": "Dup", "space": {"name": "B"}}"#);
    write(root, "c/2.json", r#"{"title": "Dup"}"#);
    write(root, "d/3.json", r#"{"title": "Dup", "space": {"name": "D"}}"#);

    let report = TitleCleanser::new().cleanse(root, None).unwrap();

    assert_eq!(report.scanned, 4);
    assert_eq!(report.skipped, 2);
    assert_eq!(title_of(&root.join("c/2.json")).as_deref(), Some("Dup"));
    assert_eq!(title_of(&root.join("d/3.json")).as_deref(), Some("Dup_D"));
}

#[test]
fn test_deleted_artifacts_do_not_claim_titles() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Dept_Folders");
    write(
        &root,
        "A/look/1.json",
        r#"{"title": "Margin", "space": {"name": "A"}, "deleted_at": "2024-01-01"}"#,
    );
    write(
        &root,
        "B/look/2.json",
        r#"{"title": "Margin", "space": {"name": "B"}, "deleted_at": null}"#,
    );

    let instance = InstanceHost::new("10.1.1.1").unwrap();
    let sweep = QuarantineSweep::for_instance(&root, &root, &instance);
    let (sweep_report, cleanse_report) = run_integrity_pass(&sweep).unwrap();

    assert_eq!(sweep_report.quarantined.len(), 1);
    assert!(!cleanse_report.changed());
    assert_eq!(title_of(&root.join("B/look/2.json")).as_deref(), Some("Margin"));
    assert!(root.join("Bad_Jsons_10.1.1.1/1.json").exists());
}

#[test]
fn test_preview_pass_reports_without_changes() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Dept_Folders");
    let deleted = r#"{"title": "Margin", "space": {"name": "A"}, "deleted_at": "2024-01-01"}"#;
    let duplicate = r#"{"title": "Cost", "space": {"name": "C"}}"#;
    write(&root, "A/look/1.json", deleted);
    write(&root, "B/look/2.json", r#"{"title": "Cost", "space": {"name": "B"}}"#);
    write(&root, "C/look/3.json", duplicate);

    let instance = InstanceHost::new("10.1.1.1").unwrap();
    let sweep = QuarantineSweep::for_instance(&root, temp.path(), &instance).with_preview(true);
    let (sweep_report, cleanse_report) = run_integrity_pass(&sweep).unwrap();

    assert_eq!(sweep_report.quarantined.len(), 1);
    assert_eq!(
        sweep_report.quarantined[0].to,
        temp.path().join("Bad_Jsons_10.1.1.1/1.json")
    );
    assert_eq!(cleanse_report.renamed.len(), 1);
    assert_eq!(cleanse_report.renamed[0].to, "Cost_C");

    assert_eq!(fs::read_to_string(root.join("A/look/1.json")).unwrap(), deleted);
    assert_eq!(fs::read_to_string(root.join("C/look/3.json")).unwrap(), duplicate);
    assert!(!temp.path().join("Bad_Jsons_10.1.1.1").exists());
}

#[cfg(unix)]
#[test]
fn test_renamed_artifacts_keep_their_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "a/1.json", r#"{"title": "Dup", "space": {"name": "A"}}"#);
    write(root, "b/2.json", r#"{"title": "Dup", "space": {"name": "B"}}"#);
    let renamed = root.join("b/2.json");
    fs::set_permissions(&renamed, fs::Permissions::from_mode(0o644)).unwrap();

    let report = TitleCleanser::new().cleanse(root, None).unwrap();

    assert_eq!(report.renamed.len(), 1);
    assert_eq!(title_of(&renamed).as_deref(), Some("Dup_B"));
    let mode = fs::metadata(&renamed).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}
