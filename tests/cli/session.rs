use super::support::{in_dir, setup_project};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_login_status_logout() {
    let dir = setup_project();

    in_dir(dir.path())
        .env("ADMIN_PASSWORD", "s3cret")
        .args(["login", "--password", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in"));

    assert!(dir.path().join(".static-notes/session.json").exists());

    in_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in since"))
        .stdout(predicate::str::contains("Pending notes: 0"));

    in_dir(dir.path()).arg("logout").assert().success();

    in_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn test_wrong_password_is_rejected() {
    let dir = setup_project();

    in_dir(dir.path())
        .env("ADMIN_PASSWORD", "s3cret")
        .args(["login", "--password", "guess"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid password"));

    assert!(!dir.path().join(".static-notes/session.json").exists());
}

#[test]
fn test_login_without_configured_password() {
    let dir = setup_project();

    in_dir(dir.path())
        .args(["login", "--password", "anything"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no admin password configured"));
}

#[test]
fn test_corrupt_session_counts_as_logged_out() {
    let dir = setup_project();
    fs::create_dir_all(dir.path().join(".static-notes")).unwrap();
    fs::write(dir.path().join(".static-notes/session.json"), "not json").unwrap();

    in_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
    assert!(!dir.path().join(".static-notes/session.json").exists());
}

#[test]
fn test_publish_requires_session() {
    let dir = setup_project();
    fs::write(dir.path().join("draft.md"), "# Draft").unwrap();

    in_dir(dir.path())
        .args(["publish", "draft.md"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("admin login required"));
}

#[test]
fn test_unpublish_requires_session() {
    let dir = setup_project();

    in_dir(dir.path())
        .args(["unpublish", "notes/2024-01-01-10-00-00.md"])
        .assert()
        .code(3);
}
