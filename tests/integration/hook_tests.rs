//! Integration tests for the hook binary's stdin/stdout contract

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use convention_gate::{decode_lenient, ActionKind, Config, PolicyEngine, RuleSet};
use tempfile::TempDir;

/// Run the hook binary with `input` on stdin, returning parsed stdout
fn run_hook_with(input: &str, config: &Path, extra_args: &[&str], envs: &[(&str, &str)]) -> serde_json::Value {
    serde_json::from_slice(&run_hook_raw(input.as_bytes(), config, extra_args, envs)).unwrap()
}

/// Run the hook binary with raw bytes on stdin, returning raw stdout
fn run_hook_raw(input: &[u8], config: &Path, extra_args: &[&str], envs: &[(&str, &str)]) -> Vec<u8> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_convention-gate"));
    command
        .arg("--config")
        .arg(config)
        .args(extra_args)
        .env_remove("CONVENTION_GATE_DISABLED")
        .env_remove("CONVENTION_GATE_WARN_ONLY")
        .env_remove("CONVENTION_GATE_FAIL_CLOSED")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        command.env(key, value);
    }

    let mut child = command.spawn().unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "hook must never fail the caller");
    output.stdout
}

fn config_dir(toml: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, toml).unwrap();
    (dir, path)
}

fn run_hook(input: &str) -> serde_json::Value {
    let (_dir, path) = config_dir("");
    run_hook_with(input, &path, &[], &[])
}

// ============================================================================
// Response shape
// ============================================================================

#[test]
fn test_blocked_command_response() {
    let output = run_hook(r#"{"tool_name":"Bash","tool_input":{"command":"rm -rf /tmp/x"}}"#);
    assert_eq!(output["decision"], "block");
    assert_eq!(output["reason"], "[safety rule] rm -rf is forbidden");
}

#[test]
fn test_allowed_command_response_is_empty() {
    let output = run_hook(r#"{"tool_name":"Bash","tool_input":{"command":"git log"}}"#);
    assert_eq!(output, serde_json::json!({}));
}

#[test]
fn test_blocked_write_response() {
    let output = run_hook(
        r#"{"tool_name":"Write","tool_input":{"file_path":"application/service/FooService.kt","content":"@Service\nclass FooService"}}"#,
    );
    assert_eq!(output["decision"], "block");
    let reason = output["reason"].as_str().unwrap();
    assert!(reason.starts_with("[convention violation] "));
    assert!(reason.contains("\nsuggested: "));
}

#[test]
fn test_edit_fallback_field() {
    let output = run_hook(
        r#"{"tool_name":"Edit","tool_input":{"file_path":"x/Y.kt","new_string":"@Transactional fun x() {}"}}"#,
    );
    assert_eq!(output["decision"], "block");
}

// ============================================================================
// Malformed input fails open
// ============================================================================

#[test]
fn test_malformed_input_allows() {
    for input in ["", "null", "{not json", "[1,2,3]", "\"Bash\"", "42"] {
        assert_eq!(run_hook(input), serde_json::json!({}), "input {input:?}");
    }
}

#[test]
fn test_malformed_input_fail_closed() {
    let (_dir, path) = config_dir("");
    let output = run_hook_with("{not json", &path, &["--fail-closed"], &[]);
    assert_eq!(output["decision"], "block");

    // Empty input is still allowed
    let output = run_hook_with("", &path, &["--fail-closed"], &[]);
    assert_eq!(output, serde_json::json!({}));
}

#[test]
fn test_mistyped_tool_name_fail_closed() {
    let (_dir, path) = config_dir("");
    let input = r#"{"tool_name":42,"tool_input":{"command":"sudo ls"}}"#;

    let output = run_hook_with(input, &path, &["--fail-closed"], &[]);
    assert_eq!(output["decision"], "block");
    assert!(output["reason"].as_str().unwrap().contains("tool_name"));

    assert_eq!(run_hook_with(input, &path, &[], &[]), serde_json::json!({}));
}

#[test]
fn test_invalid_utf8_fail_closed() {
    let (_dir, path) = config_dir("");
    let input = b"{\"tool_name\":\"Bash\",\"tool_input\":{\"command\":\"rm -rf /\xff\"}}";

    let stdout = run_hook_raw(input, &path, &["--fail-closed"], &[]);
    let output: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(output["decision"], "block");
    assert!(output["reason"].as_str().unwrap().contains("UTF-8"));

    let stdout = run_hook_raw(input, &path, &[], &[]);
    let output: serde_json::Value = serde_json::from_slice(&stdout).unwrap();
    assert_eq!(output, serde_json::json!({}));
}

#[test]
fn test_fail_closed_from_config() {
    let (_dir, path) = config_dir("[general]\nfail_closed = true\n");
    let output = run_hook_with("null", &path, &[], &[]);
    assert_eq!(output["decision"], "block");
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_dry_run_warns_without_blocking() {
    let (_dir, path) = config_dir("");
    let output = run_hook_with(
        r#"{"tool_name":"Bash","tool_input":{"command":"sudo ls"}}"#,
        &path,
        &["--dry-run"],
        &[],
    );
    assert!(output.get("decision").is_none());
    assert!(output["systemMessage"].as_str().unwrap().contains("sudo"));
}

#[test]
fn test_disabled_env_allows() {
    let (_dir, path) = config_dir("");
    let output = run_hook_with(
        r#"{"tool_name":"Bash","tool_input":{"command":"rm -rf /tmp/x"}}"#,
        &path,
        &[],
        &[("CONVENTION_GATE_DISABLED", "1")],
    );
    assert_eq!(output, serde_json::json!({}));
}

#[test]
fn test_falsy_env_switches_keep_blocking() {
    let (_dir, path) = config_dir("");
    let output = run_hook_with(
        r#"{"tool_name":"Bash","tool_input":{"command":"rm -rf /tmp/x"}}"#,
        &path,
        &[],
        &[("CONVENTION_GATE_DISABLED", "0"), ("CONVENTION_GATE_WARN_ONLY", "false")],
    );
    assert_eq!(output["decision"], "block");
}

#[test]
fn test_empty_governed_suffix_keeps_builtins() {
    let (_dir, path) = config_dir("[content]\ngoverned_suffix = \"\"\n");

    // Not a governed file: must stay out of content rules
    let output = run_hook_with(
        r#"{"tool_name":"Write","tool_input":{"file_path":"domain/README.md","content":"returns Flux<Order>"}}"#,
        &path,
        &[],
        &[],
    );
    assert_eq!(output, serde_json::json!({}));

    let output = run_hook_with(
        r#"{"tool_name":"Write","tool_input":{"file_path":"domain/Order.kt","content":"fun all(): Flux<Order>"}}"#,
        &path,
        &[],
        &[],
    );
    assert_eq!(output["decision"], "block");
}

#[test]
fn test_user_command_rule_from_config() {
    let (_dir, path) = config_dir(
        r#"
[[commands.rules]]
id = "no-flyway-clean"
pattern = "\\bflywayClean\\b"
message = "flywayClean is forbidden"
"#,
    );
    let output = run_hook_with(
        r#"{"tool_name":"Bash","tool_input":{"command":"./gradlew flywayClean"}}"#,
        &path,
        &[],
        &[],
    );
    assert_eq!(output["reason"], "[safety rule] flywayClean is forbidden");
}

#[test]
fn test_broken_user_rule_keeps_builtins() {
    let (_dir, path) = config_dir(
        r#"
[[commands.rules]]
id = "broken"
pattern = "("
message = "never compiles"
"#,
    );
    let output = run_hook_with(
        r#"{"tool_name":"Bash","tool_input":{"command":"sudo ls"}}"#,
        &path,
        &[],
        &[],
    );
    assert_eq!(output["decision"], "block");
}

#[test]
fn test_audit_log_written() {
    let dir = tempfile::tempdir().unwrap();
    let audit = dir.path().join("audit.jsonl");
    let (_cfg_dir, path) = config_dir(&format!(
        "[general]\naudit_log = true\naudit_path = {:?}\n",
        audit.to_string_lossy()
    ));

    run_hook_with(
        r#"{"tool_name":"Bash","tool_input":{"command":"sudo ls"},"session_id":"s-42"}"#,
        &path,
        &[],
        &[],
    );

    let content = std::fs::read_to_string(&audit).unwrap();
    let entry: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
    assert_eq!(entry["outcome"], "BLOCKED");
    assert_eq!(entry["rule_id"], "sudo");
    assert_eq!(entry["session_id"], "s-42");
}

// ============================================================================
// Starter config
// ============================================================================

#[test]
fn test_print_config_is_loadable() {
    let output = Command::new(env!("CARGO_BIN_EXE_convention-gate"))
        .arg("--print-config")
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let config: Config = toml::from_str(&text).unwrap();
    assert_eq!(config.content.governed_suffix, ".kt");
    assert!(config.content.builtin_rules);

    // The printed file drives the hook like the defaults do
    let (_dir, path) = config_dir(&text);
    let output = run_hook_with(
        r#"{"tool_name":"Bash","tool_input":{"command":"sudo ls"}}"#,
        &path,
        &[],
        &[],
    );
    assert_eq!(output["reason"], "[safety rule] sudo is forbidden");
}

// ============================================================================
// Library-level properties
// ============================================================================

#[test]
fn test_lenient_decode_never_blocks() {
    let engine = PolicyEngine::new(RuleSet::builtin().unwrap());
    for input in ["", "null", "{", "[]", "{\"tool_name\":null}"] {
        let request = decode_lenient(input);
        assert_eq!(request.kind, ActionKind::Other);
        assert!(engine.check(&request).is_allow());
    }
}
