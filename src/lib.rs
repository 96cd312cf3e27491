//! convention-gate - pre-action convention gate for Claude Code hooks
//!
//! Decides, before an agent edits a file or runs a shell command, whether the
//! action breaks a project convention. Matching is purely textual: ordered
//! regex rules, first match wins.
//!
//! # Features
//!
//! - **Content rules**: path-scoped forbidden patterns for governed source files
//! - **Command rules**: forbidden shell command patterns
//! - **Config file**: extra rules appended to the built-in tables, in order
//! - **Dry-run and fail-closed modes**
//! - **Audit logging**: optional JSONL log of all decisions
//!
//! # Example
//!
//! ```
//! use convention_gate::{decode, HookOutput, PolicyEngine, RuleSet};
//!
//! let engine = PolicyEngine::new(RuleSet::builtin().unwrap());
//!
//! let input = r#"{"tool_name":"Bash","tool_input":{"command":"rm -rf /tmp/x"}}"#;
//! let request = decode(input).unwrap();
//!
//! let verdict = engine.check(&request);
//! assert!(verdict.is_blocked());
//! assert!(HookOutput::from_verdict(&verdict).to_json().contains("\"block\""));
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod output;
pub mod rules;

// Re-exports for convenience
pub use config::Config;
pub use engine::PolicyEngine;
pub use error::{ConfigError, DecodeError};
pub use input::{decode, decode_lenient, ActionKind, ActionRequest, HookInput};
pub use output::{HookOutput, Verdict};
pub use rules::RuleSet;
