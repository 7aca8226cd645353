//! Command-line surface tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gifclip() -> Command {
    let mut cmd = Command::cargo_bin("gifclip").unwrap();
    cmd.env_remove("GIFCLIP_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    gifclip()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("preview"));
}

#[test]
fn test_version() {
    gifclip()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_convert_requires_input() {
    gifclip()
        .arg("convert")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_inspect_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    gifclip()
        .current_dir(dir.path())
        .args(["inspect", "-i", "missing.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.mp4"));
}

#[test]
fn test_convert_rejects_bad_time() {
    let dir = TempDir::new().unwrap();
    gifclip()
        .current_dir(dir.path())
        .args(["convert", "-i", "clip.mp4", "-s", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid start time"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    gifclip()
        .current_dir(dir.path())
        .args(["--config", "nope.toml", "inspect", "-i", "clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn test_local_config_file_is_validated() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("gifclip.toml"), "[gifclip]\nfps = 0\n").unwrap();
    gifclip()
        .current_dir(dir.path())
        .args(["inspect", "-i", "clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fps"));
}
