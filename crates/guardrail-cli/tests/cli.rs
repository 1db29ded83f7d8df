//! End-to-end CLI tests against JSON fixtures in `tests/fixtures/`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn guardrail_cmd() -> Command {
    Command::cargo_bin("guardrail").expect("guardrail binary not found")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("guardrail-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

/// Run `check` on a fixture with an optional config file; returns exit code and report JSON.
fn run_check(fixture: &str, config: Option<&str>, extra: &[&str]) -> (i32, Value, TempDir) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("out/report.json");
    let config_path = match config {
        Some(name) => fixtures_dir().join(name),
        None => temp_dir.path().join("missing.toml"),
    };

    let output = guardrail_cmd()
        .arg("--config")
        .arg(&config_path)
        .arg("check")
        .arg("--input")
        .arg(fixtures_dir().join(fixture))
        .arg("--report-out")
        .arg(&report_path)
        .args(extra)
        .output()
        .expect("run guardrail");

    let code = output.status.code().unwrap_or(-1);
    let report = read_json(&report_path);
    (code, report, temp_dir)
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read report");
    serde_json::from_str(&text).expect("parse report json")
}

fn outcomes(report: &Value) -> Vec<(String, String, String)> {
    report["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|r| {
            (
                r["resource"]["address"].as_str().unwrap_or_default().to_string(),
                r["rule_id"].as_str().unwrap_or_default().to_string(),
                r["outcome"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

#[test]
fn help_works() {
    guardrail_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"));
}

#[test]
fn clean_tree_passes() {
    let (code, report, _tmp) = run_check("clean.json", None, &[]);
    assert_eq!(code, 0);
    assert_eq!(report["schema"], "guardrail.report.v1");
    assert_eq!(report["verdict"], "pass");
    assert_eq!(report["data"]["resources_scanned"], 3);
    assert_eq!(report["data"]["summary"]["passed"], 4);
    assert_eq!(report["data"]["complete"], true);
}

#[test]
fn results_are_ordered_by_kind_then_declaration() {
    let (_, report, _tmp) = run_check("clean.json", None, &[]);
    assert_eq!(
        outcomes(&report),
        vec![
            (
                "azurerm_network_security_group.web".to_string(),
                "GR_AZURE_001".to_string(),
                "PASSED".to_string()
            ),
            (
                "azurerm_network_security_group.empty".to_string(),
                "GR_AZURE_001".to_string(),
                "PASSED".to_string()
            ),
            (
                "azurerm_storage_account.logs".to_string(),
                "GR_AZURE_002".to_string(),
                "PASSED".to_string()
            ),
            (
                "azurerm_storage_account.logs".to_string(),
                "GR_AZURE_003".to_string(),
                "PASSED".to_string()
            ),
        ]
    );
}

#[test]
fn ssh_exposed_nsg_fails_with_exit_code_2() {
    let (code, report, _tmp) = run_check("nsg_ssh_open.json", None, &["--parallelism", "2"]);
    assert_eq!(code, 2);
    assert_eq!(report["verdict"], "fail");

    let result = &report["results"][0];
    assert_eq!(result["rule_id"], "GR_AZURE_001");
    assert_eq!(result["outcome"], "FAILED");
    assert_eq!(result["category"], "NETWORKING");
    assert!(
        result["message"]
            .as_str()
            .unwrap_or_default()
            .contains("allow-ssh")
    );
    assert_eq!(
        result["fingerprint"].as_str().map(str::len),
        Some(64),
        "sha256 hex fingerprint"
    );
}

#[test]
fn unset_storage_attributes_default_to_failure() {
    let (code, report, _tmp) = run_check("storage_defaults.json", None, &[]);
    assert_eq!(code, 2);
    assert_eq!(report["data"]["summary"]["failed"], 2);
}

#[test]
fn allowlist_and_severity_override_from_config() {
    let (code, report, _tmp) = run_check("storage_defaults.json", Some("allow_legacy.toml"), &[]);
    assert_eq!(code, 0);
    assert_eq!(report["verdict"], "warn");
    assert_eq!(
        outcomes(&report),
        vec![
            (
                "azurerm_storage_account.legacy_blobs".to_string(),
                "GR_AZURE_002".to_string(),
                "SKIPPED".to_string()
            ),
            (
                "azurerm_storage_account.legacy_blobs".to_string(),
                "GR_AZURE_003".to_string(),
                "FAILED".to_string()
            ),
        ]
    );
}

#[test]
fn warn_profile_turns_failures_into_warnings() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    guardrail_cmd()
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .arg("--profile")
        .arg("warn")
        .arg("check")
        .arg("--input")
        .arg(fixtures_dir().join("nsg_ssh_open.json"))
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .success();

    let report = read_json(&report_path);
    assert_eq!(report["verdict"], "warn");
    assert_eq!(report["data"]["profile"], "warn");
}

#[test]
fn malformed_input_writes_runtime_error_report() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("report.json");

    guardrail_cmd()
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .arg("check")
        .arg("--input")
        .arg(fixtures_dir().join("malformed.json"))
        .arg("--report-out")
        .arg(&report_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/azurerm_storage_account"));

    let report = read_json(&report_path);
    assert_eq!(report["verdict"], "fail");
    assert_eq!(report["results"][0]["rule_id"], "tool.runtime");
    assert_eq!(report["results"].as_array().map(Vec::len), Some(1));
}

#[test]
fn missing_input_is_a_runtime_error() {
    let temp_dir = TempDir::new().expect("create temp dir");
    guardrail_cmd()
        .arg("check")
        .arg("--input")
        .arg(temp_dir.path().join("nope.json"))
        .arg("--report-out")
        .arg(temp_dir.path().join("report.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read configuration tree"));
}

#[test]
fn markdown_is_written_and_re_renderable() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let report_path = temp_dir.path().join("out/report.json");
    let md_path = temp_dir.path().join("out/comment.md");

    guardrail_cmd()
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .arg("check")
        .arg("--input")
        .arg(fixtures_dir().join("nsg_ssh_open.json"))
        .arg("--report-out")
        .arg(&report_path)
        .arg("--write-markdown")
        .arg("--markdown-out")
        .arg(&md_path)
        .assert()
        .code(2);

    let md = std::fs::read_to_string(&md_path).expect("read markdown");
    assert!(md.contains("Verdict: **FAIL**"));
    assert!(md.contains("azurerm_network_security_group.bastion"));

    guardrail_cmd()
        .arg("md")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Failures"));
}

#[test]
fn explain_known_and_unknown_rules() {
    guardrail_cmd()
        .arg("explain")
        .arg("GR_AZURE_002")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remediation"));

    guardrail_cmd()
        .arg("explain")
        .arg("GR_NOPE")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Available rule ids"));
}

#[test]
fn rules_lists_catalog() {
    let temp_dir = TempDir::new().expect("create temp dir");
    guardrail_cmd()
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("GR_AZURE_001"))
        .stdout(predicate::str::contains("absence=default-fail"));
}
