//! Loop phases and the pure routing function.

use std::fmt;

use serde::Serialize;

use crate::message::Message;

/// Where the conversation loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// The model must be called next.
    AwaitingModel,
    /// The last model reply has tool calls to dispatch.
    AwaitingTool,
    /// The last model reply had no tool calls; it is the final answer.
    Done,
}

impl Phase {
    /// Node that runs in this phase; `None` once done.
    pub fn node(self) -> Option<NodeKind> {
        match self {
            Phase::AwaitingModel => Some(NodeKind::Llm),
            Phase::AwaitingTool => Some(NodeKind::Tool),
            Phase::Done => None,
        }
    }
}

/// The two nodes of the loop graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Llm,
    Tool,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Llm => "llm",
            NodeKind::Tool => "tool",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase implied by the history. Only the last message matters.
pub fn route(history: &[Message]) -> Phase {
    match history.last() {
        Some(Message::Model { tool_calls, .. }) if !tool_calls.is_empty() => Phase::AwaitingTool,
        Some(Message::Model { .. }) => Phase::Done,
        _ => Phase::AwaitingModel,
    }
}
