//! Tool-calling conversation loop: state-in, state-out.
//!
//! Two nodes alternate until the model stops asking for tools:
//! `llm` calls the model with the history, `tool` dispatches the pending
//! tool calls and appends their results. Routing between them is a pure
//! function of the last message (see [`conversation::route`]).
//!
//! The weather demo that drives this crate lives in `tools/weather-agent`.

pub mod conversation;
pub mod diagram;
pub mod error;
pub mod llm;
pub mod message;
pub mod tool;

pub use conversation::{
    route, ConversationLoop, ConversationState, LoopConfig, NodeKind, Phase, StepEvent,
};
pub use error::{AgentError, ToolError, ValidationError};
pub use llm::{
    AutoPolicy, KeywordPolicy, LlmClient, LlmError, LlmResponse, MockLlm, OpenAiCompatClient,
    OpenAiCompatConfig, PolicySelector, RecordedCall, ToolPolicy,
};
pub use message::{Message, ToolCallRequest};
pub use tool::{validate_args, Tool, ToolRegistry, ToolSpec};
