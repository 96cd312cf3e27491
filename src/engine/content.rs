//! Content rule checking
//!
//! Checks Write/Edit payloads for governed source files against the content
//! rule table.

use crate::output::Verdict;
use crate::rules::RuleSet;

/// Prefix of every convention block reason
pub const VIOLATION_PREFIX: &str = "[convention violation]";

/// Check a write/edit for a convention violation.
///
/// Only files ending in the governed suffix with non-empty content are
/// checked. The first rule whose path and content patterns both match wins.
pub fn check_content(target_path: &str, content: &str, rules: &RuleSet) -> Verdict {
    if content.is_empty() || !rules.governs(target_path) {
        return Verdict::Allow;
    }

    rules
        .content_rules()
        .iter()
        .find(|rule| rule.matches(target_path, content))
        .map(|rule| {
            tracing::debug!(rule = %rule.id, path = target_path, "content rule matched");
            Verdict::block(
                rule.id.as_str(),
                format!(
                    "{} {}\nsuggested: {}",
                    VIOLATION_PREFIX, rule.message, rule.suggestion
                ),
            )
        })
        .unwrap_or(Verdict::Allow)
}
