//! Conversation state: the append-only message history of one loop run.

use std::collections::HashSet;

use crate::conversation::phase::{route, Phase};
use crate::message::{Message, ToolCallRequest};

/// Message history owned by one conversation.
///
/// Only the loop appends to it; nothing truncates or reorders it.
///
/// **Interaction**: Created by `ConversationState::new`, advanced by
/// `ConversationLoop::step`, returned by `ConversationLoop::run` once `Done`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Seeds a conversation with one user message.
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(user_text)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn phase(&self) -> Phase {
        route(&self.messages)
    }

    /// Tool calls waiting for dispatch; empty unless the phase is `AwaitingTool`.
    pub fn pending_tool_calls(&self) -> &[ToolCallRequest] {
        match self.phase() {
            Phase::AwaitingTool => self.last().map(Message::tool_calls).unwrap_or(&[]),
            _ => &[],
        }
    }

    /// The final answer once the loop is done.
    pub fn final_answer(&self) -> Option<&str> {
        match self.phase() {
            Phase::Done => self.last().map(Message::content),
            _ => None,
        }
    }

    /// True when every tool result answers a tool call issued earlier in the history.
    pub fn results_are_correlated(&self) -> bool {
        let mut issued = HashSet::new();
        for m in &self.messages {
            match m {
                Message::Model { tool_calls, .. } => {
                    issued.extend(tool_calls.iter().map(|tc| tc.id.as_str()));
                }
                Message::ToolResult { tool_call_id, .. } => {
                    if !issued.contains(tool_call_id.as_str()) {
                        return false;
                    }
                }
                Message::User { .. } => {}
            }
        }
        true
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}
