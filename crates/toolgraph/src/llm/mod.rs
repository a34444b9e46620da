//! LLM 客户端、工具策略与响应类型。
//!
//! - `LlmClient`：异步生成接口（历史 + 工具声明 + 工具策略 → 回复）
//! - `ToolPolicy` / `PolicySelector`：决定本轮是否强制调用某个工具
//! - `OpenAiCompatClient`：OpenAI 兼容的 Chat Completions 客户端（默认指向 Gemini）
//! - `MockLlm`：按脚本返回的测试替身
//! - `LlmError`：调用错误枚举

mod error;
mod mock;
mod openai;
mod policy;

pub use error::LlmError;
pub use mock::{MockLlm, RecordedCall};
pub use openai::{OpenAiCompatClient, OpenAiCompatConfig, GEMINI_OPENAI_BASE};
pub use policy::{AutoPolicy, KeywordPolicy, PolicySelector, ToolPolicy};

use std::sync::Arc;

use async_trait::async_trait;

use crate::message::{Message, ToolCallRequest};
use crate::tool::ToolSpec;

/// One model reply: text plus any tool calls the endpoint returned.
///
/// **Interaction**: Returned by `LlmClient::generate`; the `llm` node turns it
/// into `Message::Model` and appends it to the history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl LlmResponse {
    /// A final answer with no tool calls.
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    /// A reply requesting the given tool calls.
    pub fn calling(content: impl Into<String>, tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }
}

impl From<LlmResponse> for Message {
    fn from(r: LlmResponse) -> Self {
        Message::model(r.content, r.tool_calls)
    }
}

/// Model invoker used by the `llm` node.
///
/// Implementations surface every tool call the endpoint returns and never
/// validate arguments; that happens at dispatch. Any error is fatal to the
/// conversation.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(
        &self,
        history: &[Message],
        tools: &[ToolSpec],
        policy: &ToolPolicy,
    ) -> Result<LlmResponse, LlmError>;
}

/// Shared clients: lets a caller keep a handle (e.g. on a `MockLlm`) after
/// handing the client to a `ConversationLoop`.
#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn generate(
        &self,
        history: &[Message],
        tools: &[ToolSpec],
        policy: &ToolPolicy,
    ) -> Result<LlmResponse, LlmError> {
        (**self).generate(history, tools, policy).await
    }
}
