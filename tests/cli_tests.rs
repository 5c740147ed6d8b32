//! Integration tests for the qiming CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Test helper to get the CLI binary
fn qiming_cmd() -> Command {
    Command::cargo_bin("qiming").unwrap()
}

#[test]
fn test_cli_help() {
    qiming_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recommend"))
        .stdout(predicate::str::contains("predue"));
}

#[test]
fn test_recommend_json_output() {
    let output = qiming_cmd()
        .args(["recommend", "吴", "male", "--birth", "2025-10-31T10:00", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["certaintyLevel"], "FULLY_DETERMINED");
    let candidates = report["candidates"].as_array().unwrap();
    assert!(!candidates.is_empty());
    assert!(candidates[0]["fullName"].as_str().unwrap().starts_with('吴'));
    assert!(report["pluginResults"]["surname"].is_object());
}

#[test]
fn test_recommend_table_respects_top() {
    qiming_cmd()
        .args(["recommend", "李", "女", "--top", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Naming Complete"))
        .stdout(predicate::str::contains("comprehensive-scoring"));
}

#[test]
fn test_recommend_rejects_invalid_surname() {
    qiming_cmd()
        .args(["recommend", "Smith", "male", "--format", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no names could be recommended"));
}

#[test]
fn test_recommend_rejects_unknown_gender() {
    qiming_cmd()
        .args(["recommend", "吴", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown gender"));
}

#[test]
fn test_recommend_from_request_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("request.json");
    fs::write(
        &path,
        r#"{"familyName": "欧阳", "gender": "female", "predueInfo": {"year": 2025, "month": 7}}"#,
    )
    .unwrap();

    let output = qiming_cmd()
        .args(["recommend", "--request"])
        .arg(&path)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["certaintyLevel"], "ESTIMATED");
    assert!(report["predue"].is_object());
}

#[test]
fn test_predue_command_reports_crossing() {
    let output = qiming_cmd()
        .args(["predue", "--year", "2026", "--month", "2", "--day", "17", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let analysis: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(analysis["outcome"], "cross-zodiac");
    assert_eq!(analysis["contexts"].as_array().unwrap().len(), 2);
}

#[test]
fn test_resolve_command() {
    qiming_cmd()
        .args(["resolve", "嘉德"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jia1"))
        .stdout(predicate::str::contains("de2"));
}

#[test]
fn test_print_default_config() {
    qiming_cmd()
        .arg("print-default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_ms"))
        .stdout(predicate::str::contains("top_candidates"));
}

#[test]
fn test_validate_config() {
    let dir = tempdir().unwrap();
    let valid = dir.path().join("valid.yml");
    fs::write(&valid, "pipeline:\n  timeout_ms: 5000\n  top_candidates: 5\n").unwrap();
    qiming_cmd()
        .arg("validate-config")
        .arg(&valid)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    let invalid = dir.path().join("invalid.yml");
    fs::write(&invalid, "pipeline:\n  top_candidates: 0\n").unwrap();
    qiming_cmd()
        .arg("validate-config")
        .arg(&invalid)
        .assert()
        .failure();
}
