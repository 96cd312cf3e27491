//! Policy engine for convention-gate
//!
//! Routes a normalized request to the content or command rule table.

pub mod command;
pub mod content;

use crate::config::{Config, GeneralConfig};
use crate::error::{ConfigError, DecodeError};
use crate::input::{ActionKind, ActionRequest};
use crate::output::Verdict;
use crate::rules::RuleSet;

/// Rule id reported when fail-closed blocks an undecodable request
pub const MALFORMED_INPUT_RULE: &str = "malformed-input";

/// Process-level switches, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switches {
    pub enabled: bool,
    pub warn_only: bool,
    pub fail_closed: bool,
}

impl Default for Switches {
    fn default() -> Self {
        Self {
            enabled: true,
            warn_only: false,
            fail_closed: false,
        }
    }
}

impl From<&GeneralConfig> for Switches {
    fn from(general: &GeneralConfig) -> Self {
        Self {
            enabled: general.enabled,
            warn_only: general.warn_only,
            fail_closed: general.fail_closed,
        }
    }
}

/// The policy engine: immutable rule tables plus switches
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    rules: RuleSet,
    switches: Switches,
}

impl PolicyEngine {
    /// Create an engine with the given rules and default switches
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            switches: Switches::default(),
        }
    }

    /// Create an engine from a configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(RuleSet::from_config(config)?).with_switches(Switches::from(&config.general)))
    }

    pub fn with_switches(mut self, switches: Switches) -> Self {
        self.switches = switches;
        self
    }

    /// Evaluate a request against the rule tables.
    ///
    /// Pure: the same request and rules always give the same verdict.
    pub fn evaluate(&self, request: &ActionRequest) -> Verdict {
        match request.kind {
            ActionKind::ShellExec => {
                command::check_command(request.command.as_deref().unwrap_or_default(), &self.rules)
            }
            ActionKind::FileWrite | ActionKind::FileEdit => match (&request.target_path, &request.content) {
                (Some(path), Some(text)) => content::check_content(path, text, &self.rules),
                _ => Verdict::Allow,
            },
            ActionKind::Other => Verdict::Allow,
        }
    }

    /// Main entry point: evaluate with the process switches applied
    pub fn check(&self, request: &ActionRequest) -> Verdict {
        if !self.switches.enabled {
            return Verdict::Allow;
        }

        let verdict = self.evaluate(request);

        if self.switches.warn_only {
            return verdict.into_warning();
        }

        verdict
    }

    /// Verdict for a payload that could not be decoded.
    ///
    /// Fails open unless fail-closed is on. Empty input is never blocked:
    /// there is nothing to check.
    pub fn on_decode_failure(&self, error: &DecodeError) -> Verdict {
        if !self.switches.enabled || !self.switches.fail_closed || error.is_empty_input() {
            return Verdict::Allow;
        }

        let verdict = Verdict::block(
            MALFORMED_INPUT_RULE,
            format!("[convention-gate] unreadable hook input: {}", error),
        );

        if self.switches.warn_only {
            return verdict.into_warning();
        }

        verdict
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn switches(&self) -> Switches {
        self.switches
    }
}
