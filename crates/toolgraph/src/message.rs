//! Message types for the conversation history.
//!
//! Three kinds: user input, a model reply (optionally carrying tool-call
//! requests), and a tool result correlated to one of those requests by id.
//! Serialized with a `type` tag so the demo can print each step as JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// A single tool invocation requested by the model.
///
/// `arguments` keeps the JSON text exactly as the endpoint returned it; it is
/// parsed only when the tool node dispatches the call, so a malformed payload
/// becomes a tool result instead of a model-call failure.
///
/// **Interaction**: Produced by `LlmClient::generate`; consumed by
/// `ToolRegistry::dispatch`, whose result carries `id` as `tool_call_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Correlation id, unique within one model response.
    pub id: String,
    /// Tool name as registered in `ToolRegistry`.
    pub name: String,
    /// Arguments as a JSON object in text form.
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Parses `arguments` into a JSON value. Blank text is an empty object.
    pub fn parse_arguments(&self) -> Result<Value, ValidationError> {
        let raw = self.arguments.trim();
        if raw.is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(raw)
            .map_err(|e| ValidationError(format!("arguments are not valid JSON: {e}")))
    }
}

/// One entry in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// User input.
    User { content: String },
    /// Model reply; `tool_calls` is empty for a final answer.
    Model {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    /// Output of one tool call, matched to its request by `tool_call_id`.
    ToolResult {
        content: String,
        tool_call_id: String,
    },
}

impl Message {
    /// Builds a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Builds a model message.
    pub fn model(content: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self::Model {
            content: content.into(),
            tool_calls,
        }
    }

    /// Builds a tool result message.
    pub fn tool_result(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self::ToolResult {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::User { content } | Self::Model { content, .. } | Self::ToolResult { content, .. } => {
                content
            }
        }
    }

    /// Tool calls carried by a model message; empty for every other kind.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Self::Model { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_arguments_blank_is_empty_object() {
        let call = ToolCallRequest::new("c1", "get_current_weather", "  ");
        assert_eq!(call.parse_arguments().unwrap(), serde_json::json!({}));
    }

    #[test]
    fn parse_arguments_rejects_broken_json() {
        let call = ToolCallRequest::new("c1", "get_current_weather", "{\"location\": ");
        let e = call.parse_arguments().unwrap_err();
        assert!(e.0.contains("not valid JSON"));
    }

    #[test]
    fn model_message_without_tool_calls_serializes_without_field() {
        let json = serde_json::to_value(Message::model("hi", vec![])).unwrap();
        assert_eq!(json, serde_json::json!({"type": "model", "content": "hi"}));
    }

    #[test]
    fn tool_result_serializes_with_correlation_id() {
        let json = serde_json::to_value(Message::tool_result("sunny", "call_0")).unwrap();
        assert_eq!(json["type"], "tool_result");
        assert_eq!(json["tool_call_id"], "call_0");
    }

    #[test]
    fn tool_calls_accessor_is_empty_for_non_model() {
        assert!(Message::user("x").tool_calls().is_empty());
        assert!(Message::tool_result("x", "c").tool_calls().is_empty());
        let m = Message::model("", vec![ToolCallRequest::new("c", "t", "{}")]);
        assert_eq!(m.tool_calls().len(), 1);
    }
}
