//! 工具注册表：按名注册、校验与分发。
//!
//! `execute(name, args)` 先用 `validate_args(schema, args)` 校验，再调用 `Tool::invoke`。
//! `dispatch(call)` 是 tool 节点使用的入口：任何失败都转成 ToolResult 消息，不向上传播。

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::ToolError;
use crate::message::{Message, ToolCallRequest};
use crate::tool::validation;
use crate::tool::{Tool, ToolSpec};

/// 工具注册表；同名再次注册会替换旧工具并记录警告。
///
/// 按名称有序存储，`specs()` 的顺序因此稳定，发送给模型的请求体可复现。
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// 新建空注册表。
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// 注册一个工具；同名会覆盖，返回被替换的旧工具。
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Option<Box<dyn Tool>> {
        let name = tool.name().to_string();
        let replaced = self.tools.insert(name.clone(), tool);
        if replaced.is_some() {
            warn!(tool = %name, "tool registered twice; keeping the latest");
        }
        replaced
    }

    /// Builder form of `register`.
    pub fn with(mut self, tool: Box<dyn Tool>) -> Self {
        let _ = self.register(tool);
        self
    }

    /// 按名称获取工具。
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|b| b.as_ref())
    }

    /// 已注册工具的名称，按字典序。
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// 所有工具的声明，按名称排序。
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    /// 按名称执行工具；校验参数后调用 `Tool::invoke`。
    pub fn execute(&self, name: &str, args: Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        validation::validate_args(&tool.parameters_schema(), &args)?;
        tool.invoke(args)
    }

    /// Runs one tool call and returns its `ToolResult` message.
    ///
    /// Never fails: an unknown name yields `Unknown tool: {name}`, and invalid
    /// arguments or a failing handler yield `Error executing tool {name}: {error}`.
    /// The name is checked before the arguments are parsed.
    pub fn dispatch(&self, call: &ToolCallRequest) -> Message {
        if !self.tools.contains_key(&call.name) {
            warn!(tool = %call.name, call_id = %call.id, "model requested unknown tool");
            return Message::tool_result(format!("Unknown tool: {}", call.name), call.id.clone());
        }
        let outcome = call
            .parse_arguments()
            .map_err(ToolError::from)
            .and_then(|args| self.execute(&call.name, args));
        let content = match outcome {
            Ok(text) => {
                info!(tool = %call.name, call_id = %call.id, "tool call succeeded");
                text
            }
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "tool call failed");
                format!("Error executing tool {}: {}", call.name, e)
            }
        };
        Message::tool_result(content, call.id.clone())
    }
}
