//! Verdicts and the hook response encoder
//!
//! The gate is opt-in-to-block: an allowed request is answered with `{}`,
//! a blocked one with `{"decision":"block","reason":...}`.

use serde::Serialize;

/// The gate's decision for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Let the action proceed
    Allow,

    /// Stop the action
    Block { rule_id: String, reason: String },

    /// Would have blocked, but warn-only mode is on
    Warn { rule_id: String, reason: String },
}

impl Verdict {
    /// Create a block verdict
    pub fn block(rule_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Verdict::Block {
            rule_id: rule_id.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller must not run the action
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Block { .. })
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// Get the rule ID if a rule matched
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            Verdict::Allow => None,
            Verdict::Block { rule_id, .. } | Verdict::Warn { rule_id, .. } => Some(rule_id.as_str()),
        }
    }

    /// Get the human-readable reason if a rule matched
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Allow => None,
            Verdict::Block { reason, .. } | Verdict::Warn { reason, .. } => Some(reason.as_str()),
        }
    }

    /// Downgrade a block to a warning
    pub fn into_warning(self) -> Self {
        match self {
            Verdict::Block { rule_id, reason } => Verdict::Warn { rule_id, reason },
            other => other,
        }
    }
}

/// Response written to stdout for the hook caller
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct HookOutput {
    /// Present only when the action is blocked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Shown to the user without affecting the decision
    #[serde(rename = "systemMessage", skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,
}

impl HookOutput {
    /// Create an allow response (empty output = allow)
    pub fn allow() -> Self {
        HookOutput::default()
    }

    /// Create a block response with reason
    pub fn block(reason: impl Into<String>) -> Self {
        HookOutput {
            decision: Some("block"),
            reason: Some(reason.into()),
            system_message: None,
        }
    }

    /// Create a warn response (allows but shows a message)
    pub fn warn(rule_id: &str, reason: &str) -> Self {
        HookOutput {
            decision: None,
            reason: None,
            system_message: Some(format!(
                "[convention-gate:{}] dry-run, would block: {}",
                rule_id, reason
            )),
        }
    }

    /// Create output from a verdict
    pub fn from_verdict(verdict: &Verdict) -> Self {
        match verdict {
            Verdict::Allow => HookOutput::allow(),
            Verdict::Block { reason, .. } => HookOutput::block(reason.as_str()),
            Verdict::Warn { rule_id, reason } => HookOutput::warn(rule_id, reason),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
