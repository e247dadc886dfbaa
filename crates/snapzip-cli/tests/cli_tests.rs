//! Integration tests for snapzip-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::fs::File;
use std::path::Path;
use tempfile::TempDir;

fn snapzip_cmd() -> Command {
    cargo_bin_cmd!("snapzip")
}

/// Builds the sample project used by most tests.
fn sample_project() -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = temp.path();
    for (name, content) in [
        ("src/app.js", "console.log('app');"),
        ("node_modules/x/y.js", "module.exports = {};"),
        (".git/config", "[core]"),
        ("notes.log", "debug output"),
        ("README.md", "# sample"),
    ] {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    temp
}

fn archive_members(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_version_flag() {
    snapzip_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("snapzip"));
}

#[test]
fn test_help_flag() {
    snapzip_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--ignore-dirs"))
        .stdout(predicate::str::contains("--compression-level"));
}

#[test]
fn test_missing_source_is_usage_error() {
    snapzip_cmd().assert().failure();
}

#[test]
fn test_archive_default_rules() {
    let project = sample_project();
    let out = TempDir::new().unwrap();
    let archive = out.path().join("sample.zip");

    snapzip_cmd()
        .arg(project.path())
        .arg("-o")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive created"))
        .stdout(predicate::str::contains("[ADD ] src/app.js"))
        .stdout(predicate::str::contains(
            "[SKIP] node_modules (excluded directory)",
        ))
        .stdout(predicate::str::contains("[SKIP] .git (excluded directory)"))
        .stdout(predicate::str::contains(
            "[SKIP] notes.log (excluded extension)",
        ))
        .stdout(predicate::str::contains("node_modules/x").not());

    assert_eq!(archive_members(&archive), vec!["README.md", "src/app.js"]);
}

#[test]
fn test_ignore_flags_extend_defaults() {
    let project = sample_project();
    fs::write(project.path().join("secrets.json"), "{}").unwrap();
    fs::write(project.path().join("config.json"), "{}").unwrap();
    fs::write(project.path().join("old.bak"), "old").unwrap();
    fs::create_dir(project.path().join("coverage")).unwrap();
    fs::write(project.path().join("coverage/lcov.info"), "TN:").unwrap();

    let out = TempDir::new().unwrap();
    let archive = out.path().join("custom.zip");

    snapzip_cmd()
        .arg(project.path())
        .arg("--output")
        .arg(&archive)
        .args(["--ignore-dirs", "coverage"])
        .args(["--ignore-files", "secrets.json"])
        .args(["--ignore-exts", "bak"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[SKIP] secrets.json (excluded file)",
        ));

    assert_eq!(
        archive_members(&archive),
        vec!["README.md", "config.json", "src/app.js"]
    );
}

#[test]
fn test_output_directory_gets_generated_name() {
    let project = sample_project();
    let out = TempDir::new().unwrap();

    snapzip_cmd()
        .arg(project.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success();

    let folder = project
        .path()
        .canonicalize()
        .unwrap()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();
    let entries: Vec<String> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with(&format!("{folder}_")));
    assert!(
        Path::new(&entries[0])
            .extension()
            .is_some_and(|ext| ext == "zip")
    );
}

#[test]
fn test_default_output_in_current_directory() {
    let project = sample_project();
    let cwd = TempDir::new().unwrap();

    snapzip_cmd()
        .current_dir(cwd.path())
        .arg(project.path())
        .assert()
        .success();

    let zips: Vec<_> = fs::read_dir(cwd.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "zip"))
        .collect();
    assert_eq!(zips.len(), 1);
    assert_eq!(archive_members(&zips[0]), vec!["README.md", "src/app.js"]);
}

#[test]
fn test_json_output() {
    let project = sample_project();
    let out = TempDir::new().unwrap();

    let output = snapzip_cmd()
        .arg(project.path())
        .arg("-o")
        .arg(out.path().join("a.zip"))
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "success");
    assert_eq!(json["operation"], "archive");
    assert_eq!(json["data"]["files_added"], 2);
    assert_eq!(json["data"]["entries_skipped"], 3);
    assert_eq!(json["data"]["skipped_by_reason"]["excluded directory"], 2);

    let decisions = json["data"]["decisions"].as_array().unwrap();
    assert_eq!(decisions.len(), 5);
    assert!(
        decisions
            .iter()
            .any(|d| d["name"] == "notes.log" && d["reason"] == "excluded extension")
    );
}

#[test]
fn test_json_error_output() {
    let missing = TempDir::new().unwrap().path().join("gone");

    let output = snapzip_cmd()
        .arg(&missing)
        .arg("--json")
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("gone"));
}

#[test]
fn test_quiet_mode() {
    let project = sample_project();
    let out = TempDir::new().unwrap();
    let archive = out.path().join("q.zip");

    snapzip_cmd()
        .arg(project.path())
        .arg("-o")
        .arg(&archive)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(archive.exists());
}

#[test]
fn test_verbose_lists_rules() {
    let project = sample_project();
    let out = TempDir::new().unwrap();

    snapzip_cmd()
        .arg(project.path())
        .arg("-o")
        .arg(out.path().join("v.zip"))
        .args(["--ignore-exts", ".bak", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[INFO] Ignored directories:"))
        .stdout(predicate::str::contains("node_modules"))
        .stdout(predicate::str::contains("[INFO] Ignored extensions: .bak, .log"))
        .stdout(predicate::str::contains("excluded directory:"));
}

#[test]
fn test_nonexistent_source() {
    let out = TempDir::new().unwrap();
    let archive = out.path().join("never.zip");

    snapzip_cmd()
        .arg(out.path().join("does-not-exist"))
        .arg("-o")
        .arg(&archive)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ERROR"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!archive.exists());
}

#[test]
fn test_source_must_be_directory() {
    let out = TempDir::new().unwrap();
    let file = out.path().join("plain.txt");
    fs::write(&file, "x").unwrap();

    snapzip_cmd()
        .arg(&file)
        .arg("-o")
        .arg(out.path().join("x.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_invalid_compression_level() {
    let project = sample_project();

    snapzip_cmd()
        .arg(project.path())
        .args(["-l", "0"])
        .assert()
        .failure();
}

#[test]
fn test_compression_level_min() {
    let project = sample_project();
    let out = TempDir::new().unwrap();
    let archive = out.path().join("fast.zip");

    snapzip_cmd()
        .arg(project.path())
        .arg("-o")
        .arg(&archive)
        .args(["--compression-level", "1"])
        .assert()
        .success();

    assert_eq!(archive_members(&archive), vec!["README.md", "src/app.js"]);
}

#[test]
fn test_output_inside_source() {
    let project = sample_project();
    let archive = project.path().join("snapshot.zip");

    for _ in 0..2 {
        snapzip_cmd()
            .arg(project.path())
            .arg("-o")
            .arg(&archive)
            .assert()
            .success()
            .stdout(predicate::str::contains("(output archive)"));
    }

    assert_eq!(archive_members(&archive), vec!["README.md", "src/app.js"]);
}

#[test]
fn test_completions() {
    snapzip_cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("snapzip"));
}
