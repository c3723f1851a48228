//! CLI tests for the schemaviz binary.
//!
//! Only `--print` mode and failure paths are exercised here; sharing goes to
//! the network and is covered by the core crate's share tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::uninlined_format_args)]

use assert_cmd::prelude::*;
use std::path::PathBuf;
use std::process::{Command, Output};

const USERS_DOCUMENT: &str = r#"table "users" {
  schema = schema.main
  column "id" {
    null           = false
    type           = integer
    auto_increment = true
  }
  column "name" {
    null = false
    type = text
  }
  primary_key {
    columns = [column.id]
  }
}
schema "main" {
}
"#;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("schemaviz-core")
        .join("tests")
        .join("testdata")
        .join(name)
}

fn schemaviz() -> Command {
    let mut cmd = Command::cargo_bin("schemaviz").unwrap();
    cmd.env_remove("SCHEMAVIZ_DEV_URL")
        .env_remove("SCHEMAVIZ_ENDPOINT");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_cli_help() {
    let output = schemaviz().arg("--help").output().unwrap();

    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("SCHEMA_PATH"));
    assert!(help.contains("--dev-url"));
    assert!(help.contains("--global-unique-id"));
}

#[test]
fn test_cli_requires_schema_path() {
    let output = schemaviz().output().unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("SCHEMA_PATH"));
}

#[test]
#[cfg(feature = "sqlite")]
fn test_cli_print_document() {
    let output = schemaviz()
        .args(["--print", "-q"])
        .arg(testdata("users"))
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), USERS_DOCUMENT);
}

#[test]
#[cfg(feature = "sqlite")]
fn test_cli_print_global_unique_id() {
    let output = schemaviz()
        .args(["--print", "--global-unique-id", "-q"])
        .arg(testdata("blog"))
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let document = stdout(&output);
    assert!(document.starts_with("table \"ent_types\" {\n"));
    assert!(document.ends_with("schema \"main\" {\n}\n"));
}

#[test]
#[cfg(feature = "sqlite")]
fn test_cli_logs_go_to_stderr() {
    let output = schemaviz()
        .args(["--print", "-v", "--log-format", "json"])
        .arg(testdata("users"))
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), USERS_DOCUMENT);
    assert!(stderr(&output).contains("\"level\""));
}

#[test]
fn test_cli_unsupported_scheme() {
    let output = schemaviz()
        .args(["--print", "--dev-url", "oracle://localhost/dev"])
        .arg(testdata("users"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("unsupported dialect scheme: oracle"));
}

#[test]
fn test_cli_dev_url_from_env() {
    let output = schemaviz()
        .env("SCHEMAVIZ_DEV_URL", "mongodb://localhost/dev")
        .arg("--print")
        .arg(testdata("users"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unsupported dialect scheme: mongodb"));
}

#[test]
fn test_cli_invalid_log_format() {
    let output = schemaviz()
        .args(["--print", "--log-format", "xml"])
        .arg(testdata("users"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
#[cfg(feature = "sqlite")]
fn test_cli_missing_schema_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = schemaviz()
        .arg("--print")
        .arg(dir.path().join("missing"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("Error: loading schema"));
}

#[test]
#[cfg(feature = "sqlite")]
fn test_cli_invalid_entity_document() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), r#"{"entities": [{"fields": 3}]}"#).unwrap();

    let output = schemaviz().arg("--print").arg(dir.path()).output().unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("broken.json"));
}

#[test]
#[cfg(feature = "sqlite")]
fn test_cli_share_failure_prints_no_link() {
    let output = schemaviz()
        .args(["--endpoint", "not a url", "-q"])
        .arg(testdata("users"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("configuration error"));
}
