use super::support::{build, in_dir, setup_project};
use predicates::prelude::*;

#[test]
fn test_list_source_notes() {
    let dir = setup_project();

    in_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-03-10-00-00.md"))
        .stdout(predicate::str::contains("2024-01-01-10-00-00.md"));
}

#[test]
fn test_list_json() {
    let dir = setup_project();

    let output = in_dir(dir.path())
        .args(["--format", "json", "list"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "2024-01-03-10-00-00.md",
            "2024-01-02-10-00-00.md",
            "2024-01-01-10-00-00.md"
        ]
    );
}

#[test]
fn test_notes_lists_compiled_titles() {
    let dir = setup_project();
    build(dir.path());

    in_dir(dir.path())
        .arg("notes")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01-10-00-00.md  Hello"))
        .stdout(predicate::str::contains("2024-01-02-10-00-00.md  Second"))
        .stdout(predicate::str::contains("Diary").not());
}

#[test]
fn test_notes_before_build() {
    let dir = setup_project();

    in_dir(dir.path())
        .arg("notes")
        .assert()
        .success()
        .stdout(predicate::str::contains("No compiled notes yet"));
}
