//! LLM 调用相关错误类型。

use thiserror::Error;

/// LLM 调用过程中的错误枚举；对对话循环来说全部是致命错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    /// API 返回错误（如 5xx、无 choices）。
    #[error("api error: {0}")]
    Api(String),

    /// 限流（如 429）。
    #[error("rate limit: {0}")]
    RateLimit(String),

    /// 认证失败（如 401/403）。
    #[error("auth failed: {0}")]
    Auth(String),

    /// 请求参数无效（其它 4xx）。
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 网络或连接错误。
    #[error("network error: {0}")]
    Network(String),

    /// 响应解析失败。
    #[error("parsing failed: {0}")]
    Parsing(String),
}

impl LlmError {
    /// 按 HTTP 状态码归类错误；`body` 为响应正文。
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => LlmError::Auth(body),
            429 => LlmError::RateLimit(body),
            400..=499 => LlmError::InvalidRequest(body),
            _ => LlmError::Api(body),
        }
    }
}
