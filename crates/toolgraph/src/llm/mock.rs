//! Mock LLM for tests.
//!
//! Returns scripted replies in order and records the policy and history of
//! every call so tests can assert what the loop sent.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, LlmResponse, ToolPolicy};
use crate::message::{Message, ToolCallRequest};
use crate::tool::ToolSpec;

/// What one `generate` call received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub policy: ToolPolicy,
    pub history: Vec<Message>,
    pub tool_names: Vec<String>,
}

/// Mock LLM: scripted replies, one per call.
///
/// Once the script is exhausted the last reply repeats, so a single tool-call
/// reply models a model that never stops asking for tools. An empty script
/// fails every call with `LlmError::Api`.
///
/// **Interaction**: Implements `LlmClient`; used by `ConversationLoop` in tests.
pub struct MockLlm {
    script: Vec<LlmResponse>,
    cursor: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlm {
    pub fn scripted(script: Vec<LlmResponse>) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers `content` with no tool calls (END path).
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::scripted(vec![LlmResponse::answer(content)])
    }

    /// First call requests `call`, second answers `answer`.
    pub fn first_tool_then_answer(call: ToolCallRequest, answer: impl Into<String>) -> Self {
        Self::scripted(vec![
            LlmResponse::calling("", vec![call]),
            LlmResponse::answer(answer),
        ])
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(
        &self,
        history: &[Message],
        tools: &[ToolSpec],
        policy: &ToolPolicy,
    ) -> Result<LlmResponse, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                policy: policy.clone(),
                history: history.to_vec(),
                tool_names: tools.iter().map(|t| t.name.clone()).collect(),
            });
        }
        let n = self.cursor.fetch_add(1, Ordering::SeqCst);
        let last = self
            .script
            .len()
            .checked_sub(1)
            .ok_or_else(|| LlmError::Api("mock script is empty".into()))?;
        Ok(self.script[n.min(last)].clone())
    }
}
