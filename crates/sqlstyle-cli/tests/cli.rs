//! End-to-end tests for the `sqlstyle` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn sqlstyle(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sqlstyle"))
        .args(args)
        .current_dir(dir)
        .env("SQLSTYLE_CONFIG_DIR", dir.join("no-global"))
        .output()
        .expect("binary should run")
}

fn project(sql: &str, config: Option<&str>) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("query.sql"), sql).unwrap();
    if let Some(config) = config {
        fs::write(tmp.path().join("sqlstyle.toml"), config).unwrap();
    }
    tmp
}

#[test]
fn lint_reports_bare_union() {
    let tmp = project("SELECT 1 UNION SELECT 2\n", None);
    let out = sqlstyle(tmp.path(), &["lint", ".", "--format", "compact"]);

    // Warnings do not fail the default threshold
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("query.sql:1:10: warning [L033]"), "{stdout}");
}

#[test]
fn lint_fails_at_configured_threshold() {
    let tmp = project("SELECT 1 UNION SELECT 2\n", Some("fail_on = \"warning\"\n"));
    let out = sqlstyle(tmp.path(), &["lint", "."]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn lint_json_output() {
    let tmp = project("SELECT 1 UNION ALL SELECT 2\n", None);
    let out = sqlstyle(tmp.path(), &["lint", ".", "--format", "json"]);

    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["files_checked"], 1);
    assert_eq!(json["violations"].as_array().map(Vec::len), Some(0));
}

#[test]
fn fix_rewrites_file() {
    let tmp = project("select 1 union select 2;\n", None);
    let out = sqlstyle(tmp.path(), &["fix", "."]);

    assert!(out.status.success());
    let fixed = fs::read_to_string(tmp.path().join("query.sql")).unwrap();
    assert_eq!(fixed, "select 1 UNION DISTINCT select 2;\n");
}

#[test]
fn fix_check_leaves_file_alone() {
    let tmp = project("SELECT 1 UNION SELECT 2\n", None);
    let out = sqlstyle(tmp.path(), &["fix", "--check", "."]);

    assert_eq!(out.status.code(), Some(1));
    let content = fs::read_to_string(tmp.path().join("query.sql")).unwrap();
    assert_eq!(content, "SELECT 1 UNION SELECT 2\n");
}

#[test]
fn disabled_rule_is_not_reported() {
    let tmp = project(
        "SELECT 1 UNION SELECT 2\n",
        Some("fail_on = \"warning\"\n\n[rules.L033]\nenabled = false\n"),
    );
    let out = sqlstyle(tmp.path(), &["lint", "."]);
    assert!(out.status.success());
}
