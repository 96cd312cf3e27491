//! Configuration loading for convention-gate
//!
//! Supports TOML configuration with embedded defaults. Rules declared in a
//! config file are appended after the built-in tables, in file order.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::rules::DEFAULT_GOVERNED_SUFFIX;

// Each switch is on when its variable holds a truthy value (1, true, yes, on)

/// Disable every check (requests are still logged)
pub const ENV_DISABLED: &str = "CONVENTION_GATE_DISABLED";
/// Report violations without blocking
pub const ENV_WARN_ONLY: &str = "CONVENTION_GATE_WARN_ONLY";
/// Block when the hook input cannot be decoded
pub const ENV_FAIL_CLOSED: &str = "CONVENTION_GATE_FAIL_CLOSED";

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Run the checks at all
    pub enabled: bool,

    /// Downgrade blocks to warnings (dry-run)
    pub warn_only: bool,

    /// Block instead of allow when the hook input cannot be decoded
    pub fail_closed: bool,

    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn_only: false,
            fail_closed: false,
            audit_log: false,
            audit_path: Some("~/.claude/convention-gate/audit.jsonl".to_string()),
        }
    }
}

/// A content rule declared in a config file
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRuleEntry {
    pub id: String,

    /// Path pattern (matched case-insensitively)
    pub path: String,

    /// Forbidden content pattern
    pub pattern: String,

    pub message: String,

    #[serde(default)]
    pub suggestion: String,
}

/// A command rule declared in a config file
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRuleEntry {
    pub id: String,
    pub pattern: String,
    pub message: String,
}

/// Content rule configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// File-name suffix that puts a write under content rules
    pub governed_suffix: String,

    /// Include the built-in convention rules ahead of user rules
    pub builtin_rules: bool,

    pub rules: Vec<ContentRuleEntry>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            governed_suffix: DEFAULT_GOVERNED_SUFFIX.to_string(),
            builtin_rules: true,
            rules: Vec::new(),
        }
    }
}

/// Command rule configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Include the built-in command rules ahead of user rules
    pub builtin_rules: bool,

    pub rules: Vec<CommandRuleEntry>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            builtin_rules: true,
            rules: Vec::new(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub content: ContentConfig,
    pub commands: CommandsConfig,
}

impl Config {
    /// Standard config locations, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        [
            // Project-local config
            Some(PathBuf::from(".claude/convention-gate.toml")),
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/convention-gate/config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load configuration from the first readable standard location, or
    /// use defaults
    pub fn load() -> Self {
        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded configuration");
                    return config;
                }
                Err(e) => tracing::warn!("{}; trying next location", e),
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply the environment switches on top of the file settings
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply switches from any lookup (environment, tests).
    ///
    /// Unset or falsy values (`0`, `false`, empty, ...) leave the file
    /// setting alone.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let is_set = |key: &str| lookup(key).is_some_and(|value| is_truthy(&value));

        if is_set(ENV_DISABLED) {
            self.general.enabled = false;
        }
        if is_set(ENV_WARN_ONLY) {
            self.general.warn_only = true;
        }
        if is_set(ENV_FAIL_CLOSED) {
            self.general.fail_closed = true;
        }
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded), if audit logging is on
    pub fn audit_path(&self) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        self.general.audit_path.as_deref().map(Self::expand_path)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Embedded default configuration, printed as a starting point for users
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
enabled = true
warn_only = false
fail_closed = false
audit_log = false
audit_path = "~/.claude/convention-gate/audit.jsonl"

[content]
governed_suffix = ".kt"
builtin_rules = true

# [[content.rules]]
# id = "no-println"
# path = "src[/\\\\]main[/\\\\]"
# pattern = "\\bprintln\\("
# message = "println is forbidden in production code"
# suggestion = "use the injected logger"

[commands]
builtin_rules = true

# [[commands.rules]]
# id = "no-force-with-lease"
# pattern = "--force-with-lease\\b"
# message = "git push --force-with-lease is forbidden"
"#;
