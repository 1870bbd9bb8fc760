use super::support::{build, in_dir, setup_project};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_build_local_notes() {
    let dir = setup_project();

    in_dir(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Compiled 2 notes, skipped 1 (2 public of 3)",
        ));

    let out = dir.path().join("build/static-notes");
    assert!(out.join("index.json").exists());
    assert!(out.join("2024-01-01-10-00-00.md.json").exists());
    assert!(out.join("2024-01-02-10-00-00.md.json").exists());
    assert!(!out.join("2024-01-03-10-00-00.md.json").exists());

    let index: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("index.json")).unwrap()).unwrap();
    assert_eq!(index["version"], "1.0.0");
    assert_eq!(index["totalNotes"], 3);
    assert_eq!(index["publicNotes"], 2);
    assert_eq!(
        index["notes"]["2024-01-01-10-00-00.md"]["tags"],
        serde_json::json!(["intro", "demo"])
    );
    assert!(!fs::read_to_string(out.join("index.json"))
        .unwrap()
        .contains("Diary entry"));
}

#[test]
fn test_second_build_compiles_nothing() {
    let dir = setup_project();
    build(dir.path());
    let before =
        fs::read_to_string(dir.path().join("build/static-notes/2024-01-02-10-00-00.md.json"))
            .unwrap();

    in_dir(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiled 0 notes, skipped 3"));

    let after =
        fs::read_to_string(dir.path().join("build/static-notes/2024-01-02-10-00-00.md.json"))
            .unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_build_json_output() {
    let dir = setup_project();

    let output = in_dir(dir.path())
        .args(["--format", "json", "build"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["compiled"], 2);
    assert_eq!(json["skipped"], 1);
    assert_eq!(json["synced_files"], serde_json::Value::Null);
}

#[test]
fn test_build_with_sync() {
    let dir = setup_project();

    in_dir(dir.path())
        .args(["build", "--sync"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 3 files"));

    assert!(dir.path().join("public/static-notes/index.json").exists());
}

#[test]
fn test_deleted_note_is_pruned() {
    let dir = setup_project();
    build(dir.path());
    fs::remove_file(dir.path().join("notes/2024-01-02-10-00-00.md")).unwrap();

    in_dir(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pruned 1 stale artifacts"));

    assert!(!dir
        .path()
        .join("build/static-notes/2024-01-02-10-00-00.md.json")
        .exists());
}

#[test]
fn test_build_without_source_is_config_error() {
    let dir = tempdir().unwrap();

    in_dir(dir.path())
        .arg("build")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_build_env_overrides_config_file() {
    let dir = setup_project();
    let other = dir.path().join("other");
    fs::create_dir_all(&other).unwrap();
    fs::write(other.join("2024-05-05-05-05-05.md"), "Only note").unwrap();

    in_dir(dir.path())
        .env("NOTES_DIR", &other)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 public of 1)"));
}

#[test]
fn test_missing_notes_dir_fails() {
    let dir = setup_project();
    fs::remove_dir_all(dir.path().join("notes")).unwrap();

    in_dir(dir.path())
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("notes directory does not exist"));
    assert!(!dir.path().join("build/static-notes/index.json").exists());
}
