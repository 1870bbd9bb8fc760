use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Every environment variable the binary reads
const ENV_VARS: &[&str] = &[
    "GITHUB_TOKEN",
    "GH_TOKEN",
    "GITHUB_ACCESS_TOKEN",
    "GITHUB_OWNER",
    "GITHUB_REPO_OWNER",
    "NOTES_REPO_OWNER",
    "GITHUB_REPO",
    "GITHUB_REPO_NAME",
    "NOTES_REPO",
    "GITHUB_BRANCH",
    "NOTES_BRANCH",
    "GITHUB_NOTES_PATH",
    "NOTES_PATH",
    "STATIC_NOTES_LOCAL_DIR",
    "NOTES_DIR",
    "STATIC_NOTES_OUTPUT_DIR",
    "STATIC_NOTES_PUBLIC_DIR",
    "ADMIN_PASSWORD",
    "STATIC_NOTES_ADMIN_PASSWORD",
    "GITHUB_API_URL",
    "STATIC_NOTES_HTTP_TIMEOUT",
    "STATIC_NOTES_LOGIN_PASSWORD",
    "RUST_LOG",
    "STATIC_NOTES_LOG",
];

/// Get a Command for static-notes with a clean environment
pub fn static_notes() -> Command {
    let mut cmd = cargo_bin_cmd!("static-notes");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Command rooted at `dir`
pub fn in_dir(dir: &Path) -> Command {
    let mut cmd = static_notes();
    cmd.current_dir(dir);
    cmd
}

pub const HELLO: &str = "---\ncreated_at: 2024-01-01T10:00:00.000Z\nprivate: false\ntags: [intro, demo]\n---\n\n# Hello\n\nWorld\n";

/// Project with a local `notes/` directory: two public notes, one private
pub fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes");
    fs::create_dir_all(&notes).unwrap();
    fs::write(notes.join("2024-01-01-10-00-00.md"), HELLO).unwrap();
    fs::write(notes.join("2024-01-02-10-00-00.md"), "# Second\n\nMore text").unwrap();
    fs::write(
        notes.join("2024-01-03-10-00-00.md"),
        "---\nprivate: true\n---\nDiary entry",
    )
    .unwrap();
    fs::write(
        dir.path().join("static-notes.toml"),
        "[paths]\nlocal_notes_dir = \"notes\"\n",
    )
    .unwrap();
    dir
}

/// Run `build` and assert success
#[allow(dead_code)]
pub fn build(dir: &Path) {
    in_dir(dir).arg("build").assert().success();
}
