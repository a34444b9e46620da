//! 工具 trait、声明与注册。
//!
//! - `Tool`: 工具接口（name、description、parameters_schema、invoke）
//! - `ToolSpec`: 发给模型的工具声明
//! - `ToolRegistry`: 按名注册、校验并分发工具调用
//! - `validate_args`: 按 schema 校验参数（见 `tool::validation`）

mod registry;
mod validation;

pub use registry::ToolRegistry;
pub use validation::validate_args;

use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;

/// Tool declaration sent to the model alongside the history.
///
/// **Interaction**: Built by `Tool::spec`, collected by `ToolRegistry::specs`,
/// serialized by `OpenAiCompatClient` as a function declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    /// Tool name the model uses in its tool calls.
    pub name: String,
    /// Human-readable description for the model.
    pub description: Option<String>,
    /// JSON Schema for the arguments (`type`, `properties`, `required`).
    pub input_schema: Value,
}

/// 工具 trait。
///
/// 与 `ToolRegistry` 配合：`register(Box<dyn Tool>)`、`dispatch(&ToolCallRequest)`。
/// `parameters_schema` 为最小 JSON Schema（如 `{"type":"object","properties":{...},"required":[...]}`），
/// 既发给模型，也用于 `validate_args` 校验。
pub trait Tool: Send + Sync {
    /// 工具名称，用于注册与调用。
    fn name(&self) -> &str;

    /// 工具描述，供模型选择与生成调用参数。
    fn description(&self) -> &str;

    /// 参数 JSON Schema。
    fn parameters_schema(&self) -> Value;

    /// 执行：传入已校验的参数对象，返回结果文本或错误。
    fn invoke(&self, args: Value) -> Result<String, ToolError>;

    /// 生成该工具的声明。
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: Some(self.description().to_string()),
            input_schema: self.parameters_schema(),
        }
    }
}
