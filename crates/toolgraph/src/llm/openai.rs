//! OpenAI 兼容的 LLM 客户端（Chat Completions API，支持 tools / tool_choice）。
//!
//! 默认指向 Gemini 的 OpenAI 兼容端点；任何兼容端（OpenAI、代理）只需替换 `api_base`。

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{LlmClient, LlmError, LlmResponse, ToolPolicy};
use crate::message::{Message, ToolCallRequest};
use crate::tool::ToolSpec;

/// Gemini OpenAI-compatible base URL.
pub const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// OpenAI 兼容配置。凭据由调用方注入（通常来自环境变量），本模块不读取环境。
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// API Key，以 Bearer 方式发送。
    pub api_key: String,
    /// Base URL，不带结尾 `/`。
    pub api_base: String,
    /// 模型 ID，如 `gemini-1.5-flash`。
    pub model: String,
    /// 采样温度；`None` 时不发送，由服务端决定。
    pub temperature: Option<f32>,
}

impl OpenAiCompatConfig {
    /// Gemini defaults: `gemini-1.5-flash`, temperature 0.5.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: GEMINI_OPENAI_BASE.to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: Some(0.5),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// 请求体中 messages 项（OpenAI 格式）。
#[derive(Debug, Serialize, PartialEq)]
struct WireMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, PartialEq)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionDecl,
}

#[derive(Debug, Serialize)]
struct WireFunctionDecl {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    parameters: Value,
}

#[derive(Debug, Serialize)]
struct RequestBody {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    #[serde(default)]
    id: Option<String>,
    function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ResponseFunction {
    name: String,
    /// Usually a JSON string; some endpoints send the object itself.
    #[serde(default)]
    arguments: Option<Value>,
}

fn to_wire(message: &Message) -> WireMessage {
    match message {
        Message::User { content } => WireMessage {
            role: "user",
            content: Some(content.clone()),
            tool_calls: vec![],
            tool_call_id: None,
        },
        Message::Model {
            content,
            tool_calls,
        } => WireMessage {
            role: "assistant",
            content: if content.is_empty() && !tool_calls.is_empty() {
                None
            } else {
                Some(content.clone())
            },
            tool_calls: tool_calls
                .iter()
                .map(|tc| WireToolCall {
                    id: tc.id.clone(),
                    kind: "function",
                    function: WireFunctionCall {
                        name: tc.name.clone(),
                        arguments: tc.arguments.clone(),
                    },
                })
                .collect(),
            tool_call_id: None,
        },
        Message::ToolResult {
            content,
            tool_call_id,
        } => WireMessage {
            role: "tool",
            content: Some(content.clone()),
            tool_calls: vec![],
            tool_call_id: Some(tool_call_id.clone()),
        },
    }
}

fn tool_choice_value(policy: &ToolPolicy) -> Value {
    match policy {
        ToolPolicy::Auto => json!("auto"),
        ToolPolicy::None => json!("none"),
        ToolPolicy::Force(name) => json!({"type": "function", "function": {"name": name}}),
    }
}

/// First `call_<n>` with `n >= position` that is not in `taken`; reserves it.
fn fill_id(position: usize, taken: &mut HashSet<String>) -> String {
    let mut n = position;
    loop {
        let id = format!("call_{n}");
        if taken.insert(id.clone()) {
            return id;
        }
        n += 1;
    }
}

/// 解析 Chat Completions 响应正文；缺少 id 的工具调用按位置补 `call_<n>`，
/// 跳过响应中已出现的 id。
fn parse_response(text: &str) -> Result<LlmResponse, LlmError> {
    let parsed: ResponseBody =
        serde_json::from_str(text).map_err(|e| LlmError::Parsing(format!("{e}: {text}")))?;
    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| LlmError::Api("response has no choices".to_string()))?;
    let raw_calls = message.tool_calls.unwrap_or_default();
    let mut taken: HashSet<String> = raw_calls
        .iter()
        .filter_map(|tc| tc.id.clone())
        .filter(|id| !id.is_empty())
        .collect();
    let tool_calls = raw_calls
        .into_iter()
        .enumerate()
        .map(|(i, tc)| {
            let arguments = match tc.function.arguments {
                Some(Value::String(s)) => s,
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            let id = match tc.id.filter(|id| !id.is_empty()) {
                Some(id) => id,
                None => fill_id(i, &mut taken),
            };
            ToolCallRequest {
                id,
                name: tc.function.name,
                arguments,
            }
        })
        .collect();
    Ok(LlmResponse {
        content: message.content.unwrap_or_default(),
        tool_calls,
    })
}

/// OpenAI-compatible Chat Completions client implementing `LlmClient`.
///
/// **Interaction**: Implements `LlmClient`; the weather demo builds it from
/// `WeatherAgentConfig` and hands it to `ConversationLoop`.
#[derive(Debug)]
pub struct OpenAiCompatClient {
    config: OpenAiCompatConfig,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// 使用给定配置构造客户端。
    pub fn new(config: OpenAiCompatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn build_body(&self, history: &[Message], tools: &[ToolSpec], policy: &ToolPolicy) -> RequestBody {
        let wire_tools: Vec<WireTool> = tools
            .iter()
            .map(|t| WireTool {
                kind: "function",
                function: WireFunctionDecl {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.input_schema.clone(),
                },
            })
            .collect();
        let tool_choice = (!wire_tools.is_empty()).then(|| tool_choice_value(policy));
        RequestBody {
            model: self.config.model.clone(),
            messages: history.iter().map(to_wire).collect(),
            tools: wire_tools,
            tool_choice,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn generate(
        &self,
        history: &[Message],
        tools: &[ToolSpec],
        policy: &ToolPolicy,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/chat/completions", self.config.api_base);
        let body = self.build_body(history, tools, policy);
        debug!(
            model = %self.config.model,
            messages = body.messages.len(),
            ?policy,
            "calling chat completions"
        );
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;
        let status = res.status();
        let text = res.text().await.map_err(|e| LlmError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(LlmError::from_status(status.as_u16(), text));
        }
        let response = parse_response(&text)?;
        debug!(tool_calls = response.tool_calls.len(), "chat completions returned");
        Ok(response)
    }
}
