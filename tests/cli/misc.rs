use super::support::{in_dir, static_notes};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_flag() {
    static_notes()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: static-notes"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn test_no_command_prints_version() {
    let dir = tempdir().unwrap();
    in_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command_is_usage_error() {
    static_notes().arg("frobnicate").assert().code(2);
}

#[test]
fn test_unknown_command_json_envelope() {
    static_notes()
        .args(["--format", "json", "frobnicate"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\": \"usage_error\"").or(
            predicate::str::contains("\"type\":\"usage_error\""),
        ));
}

#[test]
fn test_fetch_needs_a_base_url() {
    let dir = tempdir().unwrap();
    in_dir(dir.path())
        .arg("fetch")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--base-url"));
}

#[test]
fn test_bad_config_file_is_config_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("static-notes.toml"), "[paths]\nbogus = 1\n").unwrap();

    in_dir(dir.path()).arg("list").assert().code(3);
}

#[test]
fn test_log_level_debug_shows_debug_messages() {
    let dir = super::support::setup_project();

    in_dir(dir.path())
        .args(["--log-level", "debug", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("parse_args"));
}

#[test]
fn test_default_log_level_hides_debug_messages() {
    let dir = super::support::setup_project();

    in_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("parse_args").not());
}
