//! Built-in shell command rules

use crate::rules::CommandRule;

/// Command rules in evaluation order
pub const COMMAND_RULES: &[CommandRule] = &[
    CommandRule::new("rm-rf", r"\brm\s+-rf\b", "rm -rf is forbidden"),
    CommandRule::new(
        "git-push-force",
        r"\bgit\s+push\s+.*--force\b",
        "git push --force is forbidden",
    ),
    CommandRule::new(
        "git-reset-hard",
        r"\bgit\s+reset\s+--hard\b",
        "git reset --hard is forbidden",
    ),
    CommandRule::new("sudo", r"\bsudo\b", "sudo is forbidden"),
];
