use super::support::{build, in_dir, setup_project};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_sync_dry_run_touches_nothing() {
    let dir = setup_project();
    build(dir.path());

    in_dir(dir.path())
        .args(["sync", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would copy 3 files"))
        .stdout(predicate::str::contains("index.json"));

    assert!(!dir.path().join("public/static-notes").exists());
}

#[test]
fn test_sync_replaces_target() {
    let dir = setup_project();
    build(dir.path());
    let public = dir.path().join("public/static-notes");
    fs::create_dir_all(&public).unwrap();
    fs::write(public.join("stale.md.json"), "{}").unwrap();

    in_dir(dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 3 files"));

    assert!(public.join("index.json").exists());
    assert!(!public.join("stale.md.json").exists());
}

#[test]
fn test_sync_without_build_output() {
    let dir = setup_project();

    in_dir(dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to sync"));
}

#[test]
fn test_sync_into_own_output_is_rejected() {
    let dir = setup_project();
    build(dir.path());

    in_dir(dir.path())
        .env("STATIC_NOTES_PUBLIC_DIR", "build/static-notes/public")
        .arg("sync")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("target is inside source"));
    assert!(dir.path().join("build/static-notes/index.json").exists());
}
