//! End-to-end tests for the stdin/stdout hook boundary

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use security_validator::{AuditLogger, DecisionEngine, Hook, RuleCatalog};
use serde_json::Value;
use tempfile::{NamedTempFile, TempDir};

fn log_path(dir: &TempDir) -> PathBuf {
    dir.path().join("logs/security.log")
}

fn hook_at(path: &Path) -> Hook<'static> {
    Hook::new(DecisionEngine::new(
        RuleCatalog::global().unwrap(),
        AuditLogger::new(Some(path)),
    ))
}

fn respond(hook: &Hook, input: &str) -> Value {
    let mut out = Vec::new();
    hook.run(input.as_bytes(), &mut out).unwrap();
    serde_json::from_slice(&out).unwrap()
}

fn log_lines(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_rm_rf_root_scenario() {
    let dir = TempDir::new().unwrap();
    let hook = hook_at(&log_path(&dir));

    let response = respond(&hook, r#"{"tool_input":{"command":"rm -rf /"}}"#);
    assert_eq!(response["decision"], "block");
    let reason = response["reason"].as_str().unwrap();
    assert!(reason.contains("rm -rf /"));
    assert!(reason.contains("Deleting the root directory is prohibited"));
    assert!(reason.contains(&log_path(&dir).display().to_string()));

    let lines = log_lines(&log_path(&dir));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["action"], "BLOCKED");
    assert_eq!(lines[0]["command"], "rm -rf /");
    assert_eq!(lines[0]["reason"], "Deleting the root directory is prohibited");
    for key in ["timestamp", "user", "pwd"] {
        assert!(lines[0][key].is_string(), "missing {}", key);
    }
}

#[test]
fn test_safe_command_scenario() {
    let dir = TempDir::new().unwrap();
    let hook = hook_at(&log_path(&dir));

    let response = respond(&hook, r#"{"tool_input":{"command":"ls -la"}}"#);
    assert_eq!(response, serde_json::json!({"decision": "approve"}));
    assert!(log_lines(&log_path(&dir)).is_empty());
}

#[test]
fn test_empty_object_scenario() {
    let dir = TempDir::new().unwrap();
    let hook = hook_at(&log_path(&dir));

    for input in [
        "{}",
        r#"{"tool_input":{}}"#,
        r#"{"tool_input":{"command":""}}"#,
        r#"{"tool_input":null}"#,
        r#"{"tool_input":{"command":null}}"#,
        r#"{"tool_name":"Bash","session_id":"abc","tool_input":{"command":""}}"#,
    ] {
        assert_eq!(respond(&hook, input), serde_json::json!({"decision": "approve"}));
    }
    assert!(log_lines(&log_path(&dir)).is_empty());
}

#[test]
fn test_invalid_json_scenario() {
    let dir = TempDir::new().unwrap();
    let hook = hook_at(&log_path(&dir));

    let response = respond(&hook, "not valid json");
    assert_eq!(response["decision"], "block");
    assert_eq!(response["reason"], "Failed to parse hook input");

    let lines = log_lines(&log_path(&dir));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["action"], "ERROR");
    assert_eq!(lines[0]["command"], "INVALID_JSON: not valid json");
}

#[test]
fn test_oversized_invalid_json_truncated() {
    let dir = TempDir::new().unwrap();
    let hook = hook_at(&log_path(&dir));

    let payload = format!("{{\"tool_input\": {}", "ü".repeat(5000));
    respond(&hook, &payload);

    let lines = log_lines(&log_path(&dir));
    let command = lines[0]["command"].as_str().unwrap();
    let snapshot = command.strip_prefix("INVALID_JSON: ").unwrap();
    assert_eq!(snapshot.chars().count(), 200);
}

#[test]
fn test_empty_input_blocks() {
    let dir = TempDir::new().unwrap();
    let hook = hook_at(&log_path(&dir));

    let response = respond(&hook, "");
    assert_eq!(response["decision"], "block");
}

#[test]
fn test_multiline_command_blocked() {
    let dir = TempDir::new().unwrap();
    let hook = hook_at(&log_path(&dir));

    let response = respond(&hook, r#"{"tool_input":{"command":"cd /tmp\nsudo reboot"}}"#);
    assert_eq!(response["decision"], "block");
}

// ============================================================================
// Logging never changes the verdict
// ============================================================================

#[test]
fn test_unwritable_log_same_verdict() {
    let dir = TempDir::new().unwrap();
    let writable = hook_at(&log_path(&dir));

    let blocker = NamedTempFile::new().unwrap();
    let unwritable = hook_at(&blocker.path().join("logs/security.log"));

    for input in [
        r#"{"tool_input":{"command":"rm -rf /"}}"#,
        r#"{"tool_input":{"command":"ls -la"}}"#,
        r#"{"tool_input":{"command":"chmod 777 /srv"}}"#,
        "not valid json",
        "{}",
    ] {
        let a = respond(&writable, input);
        let b = respond(&unwritable, input);
        assert_eq!(a["decision"], b["decision"], "verdicts differ for {:?}", input);
    }
}

#[test]
fn test_one_record_per_block() {
    let dir = TempDir::new().unwrap();
    let hook = hook_at(&log_path(&dir));

    respond(&hook, r#"{"tool_input":{"command":"sudo reboot"}}"#);
    respond(&hook, r#"{"tool_input":{"command":"git status"}}"#);
    respond(&hook, r#"{"tool_input":{"command":"mkfs.ext4 /dev/sdb1"}}"#);

    let lines = log_lines(&log_path(&dir));
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["command"], "sudo reboot");
    assert_eq!(lines[1]["command"], "mkfs.ext4 /dev/sdb1");
}

// ============================================================================
// Binary
// ============================================================================

fn run_binary(home: &Path, args: &[&str], stdin: &str) -> (bool, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_security-validator"))
        .args(args)
        .env("HOME", home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    (
        output.status.success(),
        String::from_utf8(output.stdout).unwrap(),
        String::from_utf8(output.stderr).unwrap(),
    )
}

#[test]
fn test_binary_blocks_and_exits_zero() {
    let home = TempDir::new().unwrap();
    let log = home.path().join("audit/security.log");
    let log_arg = log.display().to_string();

    let (ok, stdout, _) = run_binary(
        home.path(),
        &["--log-path", &log_arg],
        r#"{"tool_input":{"command":"rm -rf /"}}"#,
    );
    assert!(ok);

    let response: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(response["decision"], "block");
    assert_eq!(stdout.lines().count(), 1);
    assert_eq!(log_lines(&log).len(), 1);
}

#[test]
fn test_binary_invalid_json_stdout_is_pure_json() {
    let home = TempDir::new().unwrap();
    let (ok, stdout, _) = run_binary(home.path(), &["--no-audit"], "garbage");
    assert!(ok);

    let response: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(response["decision"], "block");
    assert_eq!(response["reason"], "Failed to parse hook input");
}

#[test]
fn test_binary_default_log_under_home() {
    let home = TempDir::new().unwrap();
    let (ok, _, _) = run_binary(home.path(), &[], r#"{"tool_input":{"command":"sudo id"}}"#);
    assert!(ok);

    let lines = log_lines(&home.path().join(".claude/logs/security.log"));
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["action"], "BLOCKED");
}

#[test]
fn test_binary_check_mode() {
    let home = TempDir::new().unwrap();
    let (ok, stdout, _) = run_binary(home.path(), &["--no-audit", "--check", "ls -la"], "");
    assert!(ok);
    assert_eq!(stdout.trim(), r#"{"decision":"approve"}"#);
}

#[test]
fn test_binary_list_rules() {
    let home = TempDir::new().unwrap();
    let (ok, stdout, _) = run_binary(home.path(), &["--list-rules"], "");
    assert!(ok);

    let first = stdout.lines().next().unwrap();
    assert!(first.starts_with("sudo\tprivilege-escalation\t"));
    assert_eq!(
        stdout.lines().count(),
        RuleCatalog::global().unwrap().len()
    );
}
