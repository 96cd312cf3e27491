//! Rule tables for convention-gate
//!
//! Two ordered tables: content rules (path pattern + forbidden content
//! pattern, for governed source files) and command rules (forbidden shell
//! command patterns). Order is part of the contract: the first matching rule
//! wins, so tables are kept as plain vectors and scanned linearly.

pub mod commands;
pub mod conventions;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::config::{CommandRuleEntry, Config, ContentRuleEntry};
use crate::error::ConfigError;

/// A built-in content rule definition
#[derive(Debug, Clone)]
pub struct ContentRule {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Pattern matched against the target path (case-insensitive)
    pub path: &'static str,

    /// Forbidden pattern searched for in the content (case-sensitive)
    pub pattern: &'static str,

    /// What was violated
    pub message: &'static str,

    /// What to do instead
    pub suggestion: &'static str,
}

impl ContentRule {
    pub const fn new(
        id: &'static str,
        path: &'static str,
        pattern: &'static str,
        message: &'static str,
        suggestion: &'static str,
    ) -> Self {
        Self {
            id,
            path,
            pattern,
            message,
            suggestion,
        }
    }
}

/// A built-in command rule definition
#[derive(Debug, Clone)]
pub struct CommandRule {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Pattern searched for anywhere in the command (case-sensitive)
    pub pattern: &'static str,

    /// Human-readable reason for blocking
    pub message: &'static str,
}

impl CommandRule {
    pub const fn new(id: &'static str, pattern: &'static str, message: &'static str) -> Self {
        Self {
            id,
            pattern,
            message,
        }
    }
}

/// A content rule with its patterns compiled
#[derive(Debug, Clone)]
pub struct CompiledContentRule {
    pub id: String,
    pub path: Regex,
    pub pattern: Regex,
    pub message: String,
    pub suggestion: String,
}

impl CompiledContentRule {
    pub fn compile(
        id: &str,
        path: &str,
        pattern: &str,
        message: &str,
        suggestion: &str,
    ) -> Result<Self, ConfigError> {
        let invalid = |source: regex::Error| ConfigError::InvalidPattern {
            id: id.to_string(),
            source,
        };

        Ok(Self {
            id: id.to_string(),
            path: RegexBuilder::new(path)
                .case_insensitive(true)
                .build()
                .map_err(invalid)?,
            pattern: Regex::new(pattern).map_err(invalid)?,
            message: message.to_string(),
            suggestion: suggestion.to_string(),
        })
    }

    /// Both the path and the content must match for the rule to fire
    pub fn matches(&self, target_path: &str, content: &str) -> bool {
        self.path.is_match(target_path) && self.pattern.is_match(content)
    }
}

/// A command rule with its pattern compiled
#[derive(Debug, Clone)]
pub struct CompiledCommandRule {
    pub id: String,
    pub pattern: Regex,
    pub message: String,
}

impl CompiledCommandRule {
    pub fn compile(id: &str, pattern: &str, message: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            id: id.to_string(),
            pattern: Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                id: id.to_string(),
                source,
            })?,
            message: message.to_string(),
        })
    }

    pub fn matches(&self, command: &str) -> bool {
        self.pattern.is_match(command)
    }
}

/// The file-name suffix that puts a write under content rules
pub const DEFAULT_GOVERNED_SUFFIX: &str = ".kt";

/// Immutable, ordered rule tables shared by every evaluation
#[derive(Debug, Clone)]
pub struct RuleSet {
    governed_suffix: String,
    content: Vec<CompiledContentRule>,
    commands: Vec<CompiledCommandRule>,
}

static BUILTIN: Lazy<Result<RuleSet, String>> =
    Lazy::new(|| compile_builtin().map_err(|e| e.to_string()));

fn compile_builtin() -> Result<RuleSet, ConfigError> {
    let mut rules = RuleSet::empty(DEFAULT_GOVERNED_SUFFIX);
    rules.extend_builtin_content()?;
    rules.extend_builtin_commands()?;
    Ok(rules)
}

impl RuleSet {
    /// A rule set with no rules; every request is allowed
    pub fn empty(governed_suffix: impl Into<String>) -> Self {
        Self {
            governed_suffix: governed_suffix.into(),
            content: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// The built-in tables with the default governed suffix
    pub fn builtin() -> Result<Self, ConfigError> {
        match BUILTIN.as_ref() {
            Ok(rules) => Ok(rules.clone()),
            // Compile again to recover the typed error
            Err(_) => compile_builtin(),
        }
    }

    /// Build the tables described by a configuration: built-in rules first
    /// (unless disabled), then user rules in file order
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        if config.content.governed_suffix.is_empty() {
            return Err(ConfigError::EmptySuffix);
        }

        let mut rules = Self::empty(config.content.governed_suffix.clone());

        if config.content.builtin_rules {
            rules.extend_builtin_content()?;
        }
        for entry in &config.content.rules {
            rules.push_content_entry(entry)?;
        }

        if config.commands.builtin_rules {
            rules.extend_builtin_commands()?;
        }
        for entry in &config.commands.rules {
            rules.push_command_entry(entry)?;
        }

        Ok(rules)
    }

    fn extend_builtin_content(&mut self) -> Result<(), ConfigError> {
        for rule in conventions::CONTENT_RULES {
            self.content.push(CompiledContentRule::compile(
                rule.id,
                rule.path,
                rule.pattern,
                rule.message,
                rule.suggestion,
            )?);
        }
        Ok(())
    }

    fn extend_builtin_commands(&mut self) -> Result<(), ConfigError> {
        for rule in commands::COMMAND_RULES {
            self.commands
                .push(CompiledCommandRule::compile(rule.id, rule.pattern, rule.message)?);
        }
        Ok(())
    }

    fn push_content_entry(&mut self, entry: &ContentRuleEntry) -> Result<(), ConfigError> {
        self.content.push(CompiledContentRule::compile(
            &entry.id,
            &entry.path,
            &entry.pattern,
            &entry.message,
            &entry.suggestion,
        )?);
        Ok(())
    }

    fn push_command_entry(&mut self, entry: &CommandRuleEntry) -> Result<(), ConfigError> {
        self.commands.push(CompiledCommandRule::compile(
            &entry.id,
            &entry.pattern,
            &entry.message,
        )?);
        Ok(())
    }

    pub fn governed_suffix(&self) -> &str {
        &self.governed_suffix
    }

    /// Whether content rules apply to this path at all
    pub fn governs(&self, target_path: &str) -> bool {
        target_path.ends_with(&self.governed_suffix)
    }

    pub fn content_rules(&self) -> &[CompiledContentRule] {
        &self.content
    }

    pub fn command_rules(&self) -> &[CompiledCommandRule] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.commands.is_empty()
    }
}
