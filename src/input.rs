//! Input parsing for OpenClaw hook events
//!
//! Parses the JSON event the host hands to the guard, tagged by `"event"`.
//! Field shapes are taken as loosely as the host sends them: scalars are
//! stringified and bootstrap entries are kept as raw JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Tag the host uses for tool calls
pub const TOOL_CALL_EVENT: &str = "before_tool_call";

/// An event delivered by the host
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event")]
pub enum HookEvent {
    #[serde(rename = "before_tool_call")]
    BeforeToolCall(ToolCallEvent),

    #[serde(rename = "agent:bootstrap")]
    AgentBootstrap(BootstrapEvent),

    #[serde(rename = "message:received")]
    MessageReceived(MessageEvent),
}

/// A pending tool invocation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallEvent {
    /// Name of the tool being invoked
    #[serde(default, deserialize_with = "lenient_string")]
    pub tool_name: String,

    /// Tool parameters; any JSON shape, `null` when absent
    #[serde(default)]
    pub params: Value,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub session_key: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub agent_id: Option<String>,
}

impl ToolCallEvent {
    pub fn new(tool_name: impl Into<String>, params: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            params,
            ..Default::default()
        }
    }
}

/// Agent startup, carrying the documents to inject
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapEvent {
    #[serde(default)]
    pub context: BootstrapContext,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapContext {
    /// `None` when the host did not provide a list to append to. Entries
    /// are whatever the host put there and pass through untouched.
    #[serde(default, deserialize_with = "array_or_none")]
    pub bootstrap_files: Option<Vec<Value>>,
}

/// An inbound chat message
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,

    /// Empty for system-generated events. Telegram chat ids arrive as numbers.
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub channel_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub from: Option<String>,
}

fn stringify(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(stringify))
}

fn array_or_none<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items),
        _ => None,
    })
}

impl HookEvent {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether unparseable input must be treated as a tool call.
    ///
    /// True when the raw input is tagged as a tool call, and also when it is
    /// not a JSON object with a string tag at all, since then nothing rules a
    /// tool call out.
    pub fn may_be_tool_call(raw: &str) -> bool {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(obj)) => match obj.get("event") {
                Some(Value::String(tag)) => tag == TOOL_CALL_EVENT,
                _ => true,
            },
            _ => true,
        }
    }

    /// Event name as the host spells it
    pub fn name(&self) -> &'static str {
        match self {
            HookEvent::BeforeToolCall(_) => TOOL_CALL_EVENT,
            HookEvent::AgentBootstrap(_) => "agent:bootstrap",
            HookEvent::MessageReceived(_) => "message:received",
        }
    }

    /// Get a summary of the input for logging
    pub fn summary(&self) -> String {
        match self {
            HookEvent::BeforeToolCall(call) => {
                let params = call.params.to_string();
                let truncated = if params.chars().count() > 100 {
                    format!("{}...", params.chars().take(100).collect::<String>())
                } else {
                    params
                };
                format!("{}: {}", call.tool_name, truncated)
            }
            HookEvent::AgentBootstrap(_) => "agent bootstrap".to_string(),
            HookEvent::MessageReceived(msg) => format!(
                "message from {} on {}",
                msg.from.as_deref().unwrap_or("unknown"),
                msg.channel_id.as_deref().unwrap_or("-")
            ),
        }
    }

    pub fn session_key(&self) -> Option<&str> {
        match self {
            HookEvent::BeforeToolCall(call) => call.session_key.as_deref(),
            _ => None,
        }
    }
}
