//! Weather demo: a chat model wired to `get_current_weather` through the
//! toolgraph conversation loop.
//!
//! `build_loop` assembles the loop from any `LlmClient`, so tests run the
//! same wiring against `MockLlm` that the binary runs against the endpoint.

pub mod config;
pub mod logging;
pub mod weather;

pub use config::{ConfigError, WeatherAgentConfig};
pub use weather::{lookup, TodayMode, WeatherInput, WeatherTool, DEFAULT_TODAY, WEATHER_TOOL_NAME};

use toolgraph::{
    ConversationLoop, KeywordPolicy, LlmClient, LoopConfig, NodeKind, StepEvent, ToolRegistry,
};

/// Words in the user's message that force the weather tool.
pub const TRIGGER_KEYWORDS: [&str; 2] = ["weather", "temperature"];

/// The conversations the binary runs, in order: (banner title, user message).
pub const CANNED_CONVERSATIONS: [(&str, &str); 4] = [
    (
        "Weather in San Francisco Today",
        "What's the weather in San Francisco today (2025-06-19)?",
    ),
    (
        "Weather in New York Tomorrow",
        "What is the current weather in New York on 2025-06-20 using your weather tool?",
    ),
    (
        "Weather in Mason, Ohio (Current Location Context)",
        "What's the weather like in Mason, Ohio today (2025-06-19)?",
    ),
    (
        "General question (no tool needed)",
        "Tell me a fun fact about giraffes.",
    ),
];

/// Policy that forces the weather tool when the user mentions weather or temperature.
pub fn weather_policy() -> KeywordPolicy {
    KeywordPolicy::new(WEATHER_TOOL_NAME, TRIGGER_KEYWORDS)
}

/// Conversation loop with the weather tool registered and the keyword policy.
pub fn build_loop(llm: Box<dyn LlmClient>, today: TodayMode, config: LoopConfig) -> ConversationLoop {
    let tools = ToolRegistry::new().with(Box::new(WeatherTool::new(today)));
    ConversationLoop::new(llm, tools)
        .with_policy(Box::new(weather_policy()))
        .with_config(config)
}

/// Stdout lines for one step: node banner, each executed tool call, the
/// step JSON, and after a model step the routing decision.
pub fn transcript(event: &StepEvent) -> Vec<String> {
    let mut lines = Vec::new();
    match event.node {
        NodeKind::Llm => lines.push("\n--- Node: llm (invoking the model) ---".to_string()),
        NodeKind::Tool => {
            lines.push("\n--- Node: tool (executing tool calls from the model) ---".to_string());
            for call in &event.executed {
                lines.push(format!("--- Tool Call: {}({}) ---", call.name, call.arguments));
            }
        }
    }
    lines.push(event.to_json().to_string());
    if event.continues_to_tool() {
        lines.push("\n--- Decision: CONTINUE (model requested tool calls) ---".to_string());
    } else if event.node == NodeKind::Llm {
        lines.push("\n--- Decision: END ---".to_string());
    }
    lines
}
