//! 对话循环与工具执行相关错误类型。
//!
//! - `AgentError`: 对话循环的致命错误（模型调用失败、步数超限）
//! - `ToolError`: 工具执行与校验错误，由 `ToolRegistry::dispatch` 转为 ToolResult 消息
//! - `ValidationError`: 参数校验错误

use thiserror::Error;

use crate::llm::LlmError;

/// 对话循环执行错误；出现即终止当前对话。
#[derive(Debug, Error)]
pub enum AgentError {
    /// 远端生成调用失败（网络、认证、解析等），不重试。
    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),
    /// 超过最大步数限制。
    #[error("max steps exceeded: {0}")]
    MaxStepsExceeded(usize),
    /// 对话没有任何消息，无法开始。
    #[error("conversation has no messages")]
    EmptyConversation,
    /// 在当前阶段无法执行该步骤（如对话已结束）。
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

/// 参数校验错误，用于 `validate_args`、`ToolCallRequest::parse_arguments` 与工具的类型化输入。
///
/// Converts to `ToolError::ValidationFailed` when raised inside `ToolRegistry::execute`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("validation failed: {0}")]
pub struct ValidationError(pub String);

/// 工具执行与参数校验错误。
///
/// 与 `Tool::invoke` 及 `ToolRegistry::execute` 配合使用；在对话循环中不会向上传播。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// 工具不存在。
    #[error("tool not found: {0}")]
    NotFound(String),
    /// 参数校验失败（缺少必填字段、类型不符、JSON 无法解析）。
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    /// 执行失败。
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<ValidationError> for ToolError {
    fn from(e: ValidationError) -> Self {
        ToolError::ValidationFailed(e.0)
    }
}
