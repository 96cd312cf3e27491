//! Request decoding for Claude Code hook JSON
//!
//! Turns the PreToolUse payload read from stdin into a normalized
//! [`ActionRequest`]. Decoding is lenient: `tool_input` fields of the wrong
//! type are treated as absent. A payload that cannot be decoded at all,
//! including one whose `tool_name` is not a string, is reported as a
//! [`DecodeError`] value, never a panic.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DecodeError;

/// Raw hook payload as sent by Claude Code
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    /// Name of the tool being invoked (e.g. "Bash", "Edit", "Write")
    #[serde(default)]
    pub tool_name: String,

    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: ToolInput,

    /// Optional session identifier
    #[serde(default, deserialize_with = "optional_string")]
    pub session_id: Option<String>,

    /// Hook event name (e.g. "PreToolUse")
    #[serde(default, deserialize_with = "optional_string")]
    pub hook_event_name: Option<String>,

    /// Working directory of the agent session
    #[serde(default, deserialize_with = "optional_string")]
    pub cwd: Option<String>,
}

/// The subset of `tool_input` fields the gate looks at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolInput {
    pub file_path: Option<String>,
    /// Full file content (Write)
    pub content: Option<String>,
    /// Replacement text (Edit)
    pub new_string: Option<String>,
    pub command: Option<String>,
}

impl<'de> Deserialize<'de> for ToolInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Take the raw value so a null or non-object tool_input degrades to
        // an empty input instead of failing the whole payload
        let value = Value::deserialize(deserializer)?;

        let Some(obj) = value.as_object() else {
            return Ok(ToolInput::default());
        };

        let field = |key: &str| obj.get(key).and_then(Value::as_str).map(String::from);

        Ok(ToolInput {
            file_path: field("file_path"),
            content: field("content"),
            new_string: field("new_string"),
            command: field("command"),
        })
    }
}

fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(String::from))
}

impl HookInput {
    /// Parse input from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        if json.trim().is_empty() {
            return Err(DecodeError::Empty);
        }

        let value: Value = serde_json::from_str(json)?;
        let Some(obj) = value.as_object() else {
            return Err(DecodeError::NotAnObject(json_type_name(&value)));
        };

        // A missing tool_name means no tool; a mistyped one is malformed
        if obj.get("tool_name").is_some_and(|name| !name.is_string()) {
            return Err(DecodeError::InvalidField("tool_name"));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Parse input from raw stdin bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let json = String::from_utf8(bytes.to_vec())?;
        Self::from_json(&json)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The action families the gate knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    FileWrite,
    FileEdit,
    ShellExec,
    /// Any other tool; always allowed without consulting a rule table
    Other,
}

impl ActionKind {
    /// Map a hook tool name to an action kind (exact, case-sensitive)
    pub fn from_tool_name(tool_name: &str) -> Self {
        match tool_name {
            "Write" => ActionKind::FileWrite,
            "Edit" => ActionKind::FileEdit,
            "Bash" => ActionKind::ShellExec,
            _ => ActionKind::Other,
        }
    }

    pub fn is_file_change(self) -> bool {
        matches!(self, ActionKind::FileWrite | ActionKind::FileEdit)
    }
}

/// A normalized request, built fresh for every hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub tool_name: String,
    pub target_path: Option<String>,
    pub content: Option<String>,
    pub command: Option<String>,
}

impl ActionRequest {
    /// A request that matches no policy scope
    pub fn other(tool_name: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Other,
            tool_name: tool_name.into(),
            target_path: None,
            content: None,
            command: None,
        }
    }

    /// Normalize a decoded hook payload
    pub fn from_hook(input: &HookInput) -> Self {
        let kind = ActionKind::from_tool_name(&input.tool_name);
        let tool = &input.tool_input;

        match kind {
            ActionKind::FileWrite | ActionKind::FileEdit => Self {
                kind,
                tool_name: input.tool_name.clone(),
                target_path: tool.file_path.clone(),
                // Ordered fallback: an empty `content` counts as absent
                content: non_empty(&tool.content)
                    .or_else(|| non_empty(&tool.new_string))
                    .map(String::from),
                command: None,
            },
            ActionKind::ShellExec => Self {
                kind,
                tool_name: input.tool_name.clone(),
                target_path: None,
                content: None,
                command: tool.command.clone(),
            },
            ActionKind::Other => Self::other(input.tool_name.clone()),
        }
    }

    /// Get a summary of the request for logging
    pub fn summary(&self) -> String {
        match self.kind {
            ActionKind::ShellExec => {
                let command = self.command.as_deref().unwrap_or_default();
                format!("{}: {}", self.tool_name, truncate(command, 100))
            }
            ActionKind::FileWrite | ActionKind::FileEdit => format!(
                "{}: {}",
                self.tool_name,
                self.target_path.as_deref().unwrap_or("<no path>")
            ),
            ActionKind::Other if self.tool_name.is_empty() => "Unknown tool".to_string(),
            ActionKind::Other => format!("Unknown tool: {}", self.tool_name),
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Decode a raw hook payload into an action request
pub fn decode(json: &str) -> Result<ActionRequest, DecodeError> {
    HookInput::from_json(json).map(|input| ActionRequest::from_hook(&input))
}

/// Decode a raw hook payload, folding any failure into an `Other` request
pub fn decode_lenient(json: &str) -> ActionRequest {
    decode(json).unwrap_or_else(|_| ActionRequest::other(""))
}
