//! convention-gate - pre-action convention gate for Claude Code hooks
//!
//! Reads one PreToolUse payload from stdin and writes the response to stdout.
//!
//! # Usage
//!
//! ```bash
//! # As a Claude Code hook (reads JSON from stdin, writes JSON to stdout)
//! echo '{"tool_name":"Bash","tool_input":{"command":"sudo ls"}}' | convention-gate
//!
//! # Show what would be blocked without blocking
//! convention-gate --dry-run
//!
//! # Print the active rule tables
//! convention-gate --list-rules
//!
//! # Write a starter config
//! convention-gate --print-config > .claude/convention-gate.toml
//! ```

use std::env;
use std::io::{self, Read, Write};

use tracing_subscriber::EnvFilter;

use convention_gate::{
    audit::AuditLogger,
    config::{Config, DEFAULT_CONFIG_TOML},
    engine::{PolicyEngine, Switches},
    error::DecodeError,
    input::{ActionRequest, HookInput},
    output::HookOutput,
    rules::RuleSet,
};

/// Environment variable holding the log filter directive
const LOG_ENV: &str = "CONVENTION_GATE_LOG";

/// Print version information
fn print_version() {
    println!("convention-gate {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"convention-gate - pre-action convention gate for Claude Code hooks

USAGE:
    convention-gate [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Load configuration from PATH only
    -d, --dry-run           Report what would be blocked, but allow
        --fail-closed       Block when the hook input cannot be decoded
        --list-rules        Print the active rules in evaluation order
        --print-config      Print a starter configuration file

ENVIRONMENT (1, true, yes or on enable a switch):
    CONVENTION_GATE_DISABLED=1      Disable all checks (still logs)
    CONVENTION_GATE_WARN_ONLY=1     Warn but don't block
    CONVENTION_GATE_FAIL_CLOSED=1   Same as --fail-closed
    CONVENTION_GATE_LOG=debug       Log filter for stderr diagnostics

CONFIG FILES (first found wins):
    .claude/convention-gate.toml
    ~/.claude/convention-gate/config.toml

USAGE AS HOOK:
    Configure in .claude/settings.json:
    {{
      "hooks": {{
        "PreToolUse": [{{
          "matcher": "Write|Edit|Bash",
          "hooks": [{{ "type": "command", "command": "convention-gate" }}]
        }}]
      }}
    }}
"#
    );
}

/// Parse command line arguments
#[derive(Debug, Default)]
struct Args {
    help: bool,
    version: bool,
    dry_run: bool,
    fail_closed: bool,
    list_rules: bool,
    print_config: bool,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-d" | "--dry-run" => result.dry_run = true,
                "--fail-closed" => result.fail_closed = true,
                "--list-rules" => result.list_rules = true,
                "--print-config" => result.print_config = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                other => tracing::warn!("ignoring unknown argument: {}", other),
            }
            i += 1;
        }

        result
    }
}

/// Diagnostics go to stderr; stdout carries only the hook response
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build the engine, degrading to the built-in rules if user rules are broken
fn build_engine(config: &Config) -> PolicyEngine {
    match PolicyEngine::from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::warn!("{}; falling back to built-in rules", e);
            let rules = RuleSet::builtin().unwrap_or_else(|e| {
                tracing::error!("built-in rules failed to compile: {}", e);
                RuleSet::empty(config.content.governed_suffix.clone())
            });
            PolicyEngine::new(rules).with_switches(Switches::from(&config.general))
        }
    }
}

fn print_rules(rules: &RuleSet) {
    println!("content rules (governed suffix \"{}\"):", rules.governed_suffix());
    for (i, rule) in rules.content_rules().iter().enumerate() {
        println!(
            "  {:>2}. {:<30} path={}  pattern={}",
            i + 1,
            rule.id,
            rule.path.as_str(),
            rule.pattern.as_str()
        );
    }

    println!("command rules:");
    for (i, rule) in rules.command_rules().iter().enumerate() {
        println!("  {:>2}. {:<30} pattern={}", i + 1, rule.id, rule.pattern.as_str());
    }
}

fn main() {
    init_logging();
    let args = Args::parse();

    // Handle help and version
    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    if args.print_config {
        print!("{}", DEFAULT_CONFIG_TOML.trim_start());
        return;
    }

    // Load configuration
    let mut config = if let Some(ref path) = args.config_path {
        Config::load_from(std::path::Path::new(path)).unwrap_or_else(|e| {
            tracing::warn!("{}; using defaults", e);
            Config::default()
        })
    } else {
        Config::load()
    };

    config.apply_env();
    if args.dry_run {
        config.general.warn_only = true;
    }
    if args.fail_closed {
        config.general.fail_closed = true;
    }

    let engine = build_engine(&config);

    if args.list_rules {
        print_rules(engine.rules());
        return;
    }

    let mut logger = AuditLogger::new(config.audit_path().as_deref());

    // Read raw bytes so non-UTF-8 input is a decode failure like any other
    let mut raw = Vec::new();
    let decoded = match io::stdin().read_to_end(&mut raw) {
        Ok(_) => HookInput::from_bytes(&raw),
        Err(e) => Err(DecodeError::from(e)),
    };

    let (request, session_id, verdict) = match decoded {
        Ok(input) => {
            let request = ActionRequest::from_hook(&input);
            let verdict = engine.check(&request);
            (request, input.session_id, verdict)
        }
        Err(e) => {
            if !e.is_empty_input() {
                tracing::warn!("{}", e);
            }
            (ActionRequest::other(""), None, engine.on_decode_failure(&e))
        }
    };

    tracing::debug!(
        request = %request.summary(),
        rule = verdict.rule_id().unwrap_or("-"),
        blocked = verdict.is_blocked(),
        "evaluated"
    );

    let disabled = !engine.switches().enabled;
    if let Err(e) = logger.log_verdict(&request, &verdict, session_id.as_deref(), disabled) {
        tracing::warn!("failed to write audit log: {}", e);
    }

    let json = HookOutput::from_verdict(&verdict).to_json();
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", json);
    let _ = handle.flush();
}
