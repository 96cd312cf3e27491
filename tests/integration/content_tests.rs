//! Integration tests for Kotlin convention rules

use convention_gate::config::{Config, ContentRuleEntry};
use convention_gate::{decode, PolicyEngine, RuleSet, Verdict};

fn engine() -> PolicyEngine {
    PolicyEngine::new(RuleSet::builtin().unwrap())
}

fn check_write(file_path: &str, content: &str) -> Verdict {
    let json = serde_json::json!({
        "tool_name": "Write",
        "tool_input": { "file_path": file_path, "content": content },
    })
    .to_string();
    engine().check(&decode(&json).unwrap())
}

fn check_edit(file_path: &str, new_string: &str) -> Verdict {
    let json = serde_json::json!({
        "tool_name": "Edit",
        "tool_input": { "file_path": file_path, "old_string": "x", "new_string": new_string },
    })
    .to_string();
    engine().check(&decode(&json).unwrap())
}

const SERVICE: &str = r#"
package com.labs.ledger.application.service

@Service
class FooService(private val port: FooPort) {
    suspend fun run() = port.load()
}
"#;

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_service_annotation_in_application_service() {
    let verdict = check_write("src/main/kotlin/application/service/FooService.kt", SERVICE);
    assert!(verdict.is_blocked());

    let reason = verdict.reason().unwrap();
    assert!(reason.contains("@Service/@Component"));
    assert!(reason.contains("@Bean"));
    assert!(reason.contains("@Configuration"));
}

#[test]
fn test_reason_carries_message_and_suggestion() {
    let verdict = check_write("domain/model/Account.kt", "suspend fun load(): Account");
    assert_eq!(
        verdict.reason(),
        Some(
            "[convention violation] suspend fun is forbidden in domain/model/\n\
             suggested: keep domain models pure; do I/O in the port/adapter layers"
        )
    );
}

#[test]
fn test_suspend_in_domain_model() {
    let content = "data class Account(val id: Long) {\n    suspend fun refresh() {}\n}";
    assert!(check_write("domain/model/Account.kt", content).is_blocked());
}

#[test]
fn test_dispatchers_io_scoped_to_persistence() {
    let content = "suspend fun find() = withContext(Dispatchers.IO) { repo.find() }";

    let verdict = check_write("adapter/out/persistence/Repo.kt", content);
    assert_eq!(verdict.rule_id(), Some("dispatchers-io-in-persistence"));

    assert!(check_write("adapter/in/web/Controller.kt", content).is_allow());
}

#[test]
fn test_edit_uses_new_string() {
    let verdict = check_edit("any/path/Foo.kt", "@Transactional fun x() {}");
    assert_eq!(verdict.rule_id(), Some("transactional-annotation"));
}

#[test]
fn test_reactive_types_in_domain() {
    assert!(check_write("domain/port/AccountPort.kt", "fun find(): Mono<Account>").is_blocked());
    assert!(check_write("adapter/in/web/Handler.kt", "fun find(): Mono<Account>").is_allow());
}

// ============================================================================
// Scope and bypass
// ============================================================================

#[test]
fn test_scope_isolation() {
    let content = "suspend fun load(): Account";
    assert!(check_write("domain/model/Foo.kt", content).is_blocked());
    assert!(check_write("domain/service/Foo.kt", content).is_allow());
}

#[test]
fn test_non_governed_suffix_never_blocks() {
    assert!(check_write("domain/model/Foo.txt", "suspend fun load()").is_allow());
    assert!(check_write("application/service/Foo.java", "@Service class Foo").is_allow());
    assert!(check_write("build.gradle.kts", "@Transactional").is_allow());
}

#[test]
fn test_windows_separators() {
    assert!(check_write(r"src\application\service\FooService.kt", "@Component class Foo").is_blocked());
}

#[test]
fn test_path_case_insensitive() {
    assert!(check_write("src/Domain/Model/Account.kt", "suspend fun x()").is_blocked());
}

#[test]
fn test_clean_files_allowed() {
    assert!(check_write("domain/model/Account.kt", "data class Account(val id: Long)").is_allow());
    assert!(check_edit("application/service/FooService.kt", "class FooService").is_allow());
}

#[test]
fn test_empty_content_allowed() {
    assert!(check_write("domain/model/Account.kt", "").is_allow());
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_earlier_rule_wins() {
    // Both service-annotation and transactional-annotation match
    let verdict = check_write(
        "application/service/FooService.kt",
        "@Service class FooService { @Transactional fun run() {} }",
    );
    assert_eq!(verdict.rule_id(), Some("service-annotation"));
}

#[test]
fn test_user_rules_run_after_builtins() {
    let mut config = Config::default();
    config.content.rules.push(ContentRuleEntry {
        id: "no-println".to_string(),
        path: r"\.kt$".to_string(),
        pattern: r"\bprintln\(".to_string(),
        message: "println is forbidden".to_string(),
        suggestion: "use the logger".to_string(),
    });
    let engine = PolicyEngine::from_config(&config).unwrap();

    let request = |content: &str| {
        let json = serde_json::json!({
            "tool_name": "Write",
            "tool_input": { "file_path": "domain/model/A.kt", "content": content },
        })
        .to_string();
        decode(&json).unwrap()
    };

    let verdict = engine.check(&request("fun main() { println(1) }"));
    assert_eq!(verdict.rule_id(), Some("no-println"));
    assert!(verdict.reason().unwrap().ends_with("suggested: use the logger"));

    // A built-in match shadows the user rule
    let verdict = engine.check(&request("suspend fun main() { println(1) }"));
    assert_eq!(verdict.rule_id(), Some("suspend-in-domain-model"));
}

#[test]
fn test_custom_governed_suffix() {
    let mut config = Config::default();
    config.content.governed_suffix = ".java".to_string();
    let engine = PolicyEngine::from_config(&config).unwrap();

    let json = r#"{"tool_name":"Write","tool_input":{"file_path":"domain/model/A.java","content":"suspend fun x()"}}"#;
    assert!(engine.check(&decode(json).unwrap()).is_blocked());

    let json = r#"{"tool_name":"Write","tool_input":{"file_path":"domain/model/A.kt","content":"suspend fun x()"}}"#;
    assert!(engine.check(&decode(json).unwrap()).is_allow());
}
