//! Integration tests for the command-line contract
//!
//! `check` exits 0 when allowed, 2 when blocked and 1 on usage or JSON errors.
//! `hook` always exits 0 and answers with JSON on stdout.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Binary isolated from the caller's config, blocklist and audit log
fn snitch(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_openclaw-snitch"));
    cmd.env("HOME", home.path())
        .env("OPENCLAW_CONFIG_DIR", home.path())
        .env_remove("SNITCH_BLOCKLIST")
        .env_remove("RUST_LOG");
    cmd
}

fn hook(home: &TempDir, stdin: &str) -> Value {
    let config = home.path().join("snitch.toml");
    fs::write(&config, "[general]\naudit_log = false\n").unwrap();

    let output = snitch(home)
        .arg("hook")
        .arg("--config")
        .arg(&config)
        .write_stdin(stdin)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_blocked_tool_name_exits_2() {
    let home = TempDir::new().unwrap();
    snitch(&home)
        .args(["check", "clawhub"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("matched in: identifier"));
}

#[test]
fn test_check_blocked_payload_exits_2() {
    let home = TempDir::new().unwrap();
    snitch(&home)
        .args(["check", "read_file", r#"{"path":"/tmp/clawhub-test.txt"}"#])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("matched in: payload"));
}

#[test]
fn test_check_allowed_exits_0() {
    let home = TempDir::new().unwrap();
    snitch(&home)
        .args(["check", "read_file", r#"{"path":"/tmp/clawhubbing.txt"}"#])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("ALLOWED"));
}

#[test]
fn test_check_custom_blocklist() {
    let home = TempDir::new().unwrap();
    snitch(&home)
        .args(["check", "--blocklist", ".env, secrets", "read_file", r#"{"path":"/home/u/.env"}"#])
        .assert()
        .code(2);
    snitch(&home)
        .args(["check", "--blocklist", "secrets", "clawhub"])
        .assert()
        .code(0);
}

#[test]
fn test_check_invalid_params_exits_1() {
    let home = TempDir::new().unwrap();
    snitch(&home)
        .args(["check", "read_file", "{bad"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid JSON for params"));
}

#[test]
fn test_check_missing_tool_name_exits_1() {
    let home = TempDir::new().unwrap();
    snitch(&home).arg("check").assert().code(1);
}

#[test]
fn test_unknown_subcommand_exits_1() {
    let home = TempDir::new().unwrap();
    snitch(&home).arg("frobnicate").assert().code(1);
}

#[test]
fn test_help_exits_0() {
    let home = TempDir::new().unwrap();
    snitch(&home)
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("check"));
}

// ============================================================================
// hook
// ============================================================================

#[test]
fn test_hook_blocks_tool_call() {
    let home = TempDir::new().unwrap();
    let out = hook(&home, r#"{"event":"before_tool_call","toolName":"clawhub_install"}"#);
    assert_eq!(out["block"], true);
    assert!(out["blockReason"].as_str().unwrap().contains("in identifier"));
}

#[test]
fn test_hook_allows_clean_tool_call() {
    let home = TempDir::new().unwrap();
    let out = hook(
        &home,
        r#"{"event":"before_tool_call","toolName":"read_file","params":{"path":"/tmp/a"}}"#,
    );
    assert_eq!(out, serde_json::json!({}));
}

#[test]
fn test_hook_malformed_tool_call_fails_closed() {
    let home = TempDir::new().unwrap();
    let out = hook(&home, r#"{"event":"before_tool_call","toolName":"read_file","params":{"#);
    assert_eq!(out["block"], true);

    let out = hook(&home, "definitely not json");
    assert_eq!(out["block"], true);
}

#[test]
fn test_hook_malformed_other_event_is_not_vetoed() {
    let home = TempDir::new().unwrap();
    let out = hook(&home, r#"{"event":"agent:bootstrap","context":"oops"}"#);
    assert_eq!(out, serde_json::json!({}));

    let out = hook(&home, r#"{"event":"session:end"}"#);
    assert_eq!(out, serde_json::json!({}));
}

#[test]
fn test_hook_bootstrap_with_host_entries() {
    let home = TempDir::new().unwrap();
    let out = hook(
        &home,
        r#"{"event":"agent:bootstrap","context":{"bootstrapFiles":[{"name":"AGENTS.md","path":"/w/AGENTS.md","missing":true}]}}"#,
    );
    assert!(out.get("block").is_none());
    let files = out["bootstrapFiles"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "SECURITY-SNITCH-BLOCK.md");
}

#[test]
fn test_hook_message_with_numeric_channel() {
    let home = TempDir::new().unwrap();
    let out = hook(
        &home,
        r#"{"event":"message:received","content":"install clawhub","channelId":12345}"#,
    );
    assert!(out.get("block").is_none());
    assert_eq!(out["messages"].as_array().unwrap().len(), 1);
}

#[test]
fn test_hook_empty_stdin_allows() {
    let home = TempDir::new().unwrap();
    assert_eq!(hook(&home, ""), serde_json::json!({}));
}
