//! JSONL audit logging for convention-gate
//!
//! Appends one line per decision. The log is write-only; the gate never
//! reads it back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::input::ActionRequest;
use crate::output::Verdict;

/// Outcome recorded for an audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Allowed,
    Blocked,
    Warn,
    Disabled,
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub outcome: Outcome,

    /// Tool that was invoked
    pub tool: String,

    /// Rule ID that matched (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    /// Summary of the request
    pub input_summary: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from a request and its verdict
    pub fn new(
        request: &ActionRequest,
        verdict: &Verdict,
        session_id: Option<&str>,
        disabled: bool,
    ) -> Self {
        let outcome = match verdict {
            _ if disabled => Outcome::Disabled,
            Verdict::Allow => Outcome::Allowed,
            Verdict::Block { .. } => Outcome::Blocked,
            Verdict::Warn { .. } => Outcome::Warn,
        };

        Self {
            timestamp: Utc::now(),
            outcome,
            tool: request.tool_name.clone(),
            rule_id: verdict.rule_id().map(String::from),
            input_summary: request.summary(),
            reason: verdict.reason().map(String::from),
            session_id: session_id.map(String::from),
        }
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Open (or create) the log at `path`; `None` gives a disabled logger
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            match OpenOptions::new().create(true).append(true).open(p) {
                Ok(file) => Some(BufWriter::new(file)),
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "audit log unavailable");
                    None
                }
            }
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a verdict
    pub fn log_verdict(
        &mut self,
        request: &ActionRequest,
        verdict: &Verdict,
        session_id: Option<&str>,
        disabled: bool,
    ) -> Result<(), std::io::Error> {
        let entry = AuditEntry::new(request, verdict, session_id, disabled);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}
