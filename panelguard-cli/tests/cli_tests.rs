//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the panelguard-cli binary (found in target/debug when
/// run via cargo test).
fn panelguard_cli() -> Command {
    cargo_bin_cmd!("panelguard-cli")
}

/// Path to panelguard library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("panelguard")
        .join("tests")
        .join("fixtures")
}

fn check_args(cmd: &mut Command) {
    cmd.arg("check")
        .arg(fixtures_dir().join("design.json"))
        .arg("--rules")
        .arg(fixtures_dir().join("rules.json"))
        .arg("--components")
        .arg(fixtures_dir().join("components.json"))
        .arg("--combinators")
        .arg(fixtures_dir().join("combinators.json"));
}

#[test]
fn test_cli_help() {
    let mut cmd = panelguard_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("panel"));
}

#[test]
fn test_cli_version() {
    let mut cmd = panelguard_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_reports_violations() {
    let mut cmd = panelguard_cli();
    check_args(&mut cmd);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ERRORS"))
        .stdout(predicate::str::contains("Summary"));
}

#[test]
fn test_cli_check_fail_on_error_gates_exit_code() {
    let mut cmd = panelguard_cli();
    check_args(&mut cmd);
    cmd.arg("--fail-on").arg("error");

    cmd.assert().code(1);
}

#[test]
fn test_cli_check_json_output() {
    let mut cmd = panelguard_cli();
    check_args(&mut cmd);
    cmd.arg("--format").arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("{"))
        .stdout(predicate::str::contains("violations"));
}

#[test]
fn test_cli_check_github_format() {
    let mut cmd = panelguard_cli();
    check_args(&mut cmd);
    cmd.arg("--format").arg("github");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("::error"));
}

#[test]
fn test_cli_check_nonexistent_file() {
    let mut cmd = panelguard_cli();

    cmd.arg("check")
        .arg("does_not_exist.json")
        .arg("--rules")
        .arg(fixtures_dir().join("rules.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_check_surfaces_rejected_rules() {
    let mut cmd = panelguard_cli();

    cmd.arg("check")
        .arg(fixtures_dir().join("design.json"))
        .arg("--rules")
        .arg(fixtures_dir().join("rules_with_bad_entry.json"))
        .arg("--components")
        .arg(fixtures_dir().join("components.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("could not be loaded"));
}

#[test]
fn test_cli_check_clean_design_passes_gate() {
    let dir = tempfile::tempdir().unwrap();
    let design = dir.path().join("design.json");
    let rules = dir.path().join("rules.json");
    std::fs::write(
        &design,
        r#"{"panels": [{"id": "p1", "name": "Main", "width": 600.0, "height": 800.0}], "components": []}"#,
    )
    .unwrap();
    std::fs::write(
        &rules,
        r#"[{"id": "r1", "name": "Bounds", "type": "global", "constraints": [{"type": "bounds"}]}]"#,
    )
    .unwrap();

    let mut cmd = panelguard_cli();
    cmd.arg("check")
        .arg(&design)
        .arg("--rules")
        .arg(&rules)
        .arg("--fail-on")
        .arg("error");

    cmd.assert()
        .code(0)
        .stdout(predicate::str::contains("No violations found"));
}

#[test]
fn test_cli_graph_command() {
    let mut cmd = panelguard_cli();

    cmd.arg("graph")
        .arg(fixtures_dir().join("rules.json"))
        .arg("--design")
        .arg(fixtures_dir().join("design.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("panel-global"))
        .stdout(predicate::str::contains("constraint-rule-bounds-0"))
        .stdout(predicate::str::contains("panel-p1"));
}

#[test]
fn test_cli_rules_command() {
    let mut cmd = panelguard_cli();

    cmd.arg("rules");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("co-usage"))
        .stdout(predicate::str::contains("panelSizeMapping"));
}

#[test]
fn test_cli_rules_verbose() {
    let mut cmd = panelguard_cli();

    cmd.arg("rules").arg("--verbose");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("specs.panelSize"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let mut cmd_human = panelguard_cli();
    check_args(&mut cmd_human);
    let human_output = cmd_human.output().unwrap();

    let mut cmd_json = panelguard_cli();
    check_args(&mut cmd_json);
    cmd_json.arg("--format").arg("json");
    let json_output = cmd_json.output().unwrap();

    assert_ne!(
        human_output.stdout, json_output.stdout,
        "Different formats should produce different output"
    );
}
