//! Shell command checking
//!
//! Matches the raw command text against the command rule table. There is no
//! shell parsing: a rule matches anywhere in the string.

use crate::output::Verdict;
use crate::rules::RuleSet;

/// Prefix of every command block reason
pub const SAFETY_PREFIX: &str = "[safety rule]";

/// Check a shell command; the first matching rule wins
pub fn check_command(command: &str, rules: &RuleSet) -> Verdict {
    for rule in rules.command_rules() {
        if rule.matches(command) {
            tracing::debug!(rule = %rule.id, "command rule matched");
            return Verdict::block(
                rule.id.as_str(),
                format!("{} {}", SAFETY_PREFIX, rule.message),
            );
        }
    }

    Verdict::Allow
}
