//! Integration tests for ConversationLoop: routing, dispatch order, error recovery, limits.
//!
//! Uses MockLlm and a local `clock` tool; no network.

use serde_json::{json, Value};
use toolgraph::{
    AgentError, ConversationLoop, ConversationState, KeywordPolicy, LlmError, LlmResponse,
    LoopConfig, Message, MockLlm, NodeKind, Phase, Tool, ToolCallRequest, ToolError, ToolPolicy,
    ToolRegistry,
};

/// Returns the time of a city; only knows "Paris".
struct ClockTool;

impl Tool for ClockTool {
    fn name(&self) -> &str {
        "clock"
    }

    fn description(&self) -> &str {
        "Returns the local time of a city."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"]
        })
    }

    fn invoke(&self, args: Value) -> Result<String, ToolError> {
        match args["city"].as_str() {
            Some("Paris") => Ok("12:00".into()),
            Some(other) => Ok(format!("no clock for {other}")),
            None => Err(ToolError::ValidationFailed("city".into())),
        }
    }
}

fn clock_call(id: &str, city: &str) -> ToolCallRequest {
    ToolCallRequest::new(id, "clock", json!({ "city": city }).to_string())
}

fn agent(script: Vec<LlmResponse>) -> ConversationLoop {
    ConversationLoop::new(
        Box::new(MockLlm::scripted(script)),
        ToolRegistry::new().with(Box::new(ClockTool)),
    )
}

#[tokio::test]
async fn answer_without_tool_calls_ends_after_one_step() {
    let agent = agent(vec![LlmResponse::answer("Hello.")]);
    let mut events = vec![];
    let out = agent
        .run_with(ConversationState::new("Hi"), |e| events.push(e.clone()))
        .await
        .unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out.final_answer(), Some("Hello."));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].node, NodeKind::Llm);
    assert_eq!(events[0].next, Phase::Done);
    assert!(!events[0].continues_to_tool());
}

#[tokio::test]
async fn tool_round_then_answer() {
    let agent = agent(vec![
        LlmResponse::calling("", vec![clock_call("c1", "Paris")]),
        LlmResponse::answer("It is noon in Paris."),
    ]);
    let mut events = vec![];
    let out = agent
        .run_with(ConversationState::new("Time in Paris?"), |e| events.push(e.clone()))
        .await
        .unwrap();
    let nodes: Vec<NodeKind> = events.iter().map(|e| e.node).collect();
    assert_eq!(nodes, vec![NodeKind::Llm, NodeKind::Tool, NodeKind::Llm]);
    assert!(events[0].executed.is_empty());
    assert_eq!(events[1].executed, vec![clock_call("c1", "Paris")]);
    let messages = out.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2], Message::tool_result("12:00", "c1"));
    assert_eq!(out.final_answer(), Some("It is noon in Paris."));
    assert!(out.results_are_correlated());
}

#[tokio::test]
async fn multiple_calls_run_in_model_order() {
    let agent = agent(vec![
        LlmResponse::calling(
            "checking",
            vec![clock_call("a", "Oslo"), clock_call("b", "Paris"), clock_call("c", "Lima")],
        ),
        LlmResponse::answer("done"),
    ]);
    let out = agent.run("Times?").await.unwrap();
    let results: Vec<(&str, &str)> = out
        .messages()
        .iter()
        .filter_map(|m| match m {
            Message::ToolResult {
                content,
                tool_call_id,
            } => Some((tool_call_id.as_str(), content.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        results,
        vec![("a", "no clock for Oslo"), ("b", "12:00"), ("c", "no clock for Lima")]
    );
}

#[tokio::test]
async fn unknown_tool_is_reported_and_loop_continues() {
    let agent = agent(vec![
        LlmResponse::calling("", vec![ToolCallRequest::new("x1", "get_stock_price", "{}")]),
        LlmResponse::answer("Sorry, I can't do that."),
    ]);
    let out = agent.run("AAPL?").await.unwrap();
    assert_eq!(
        out.messages()[2],
        Message::tool_result("Unknown tool: get_stock_price", "x1")
    );
    assert_eq!(out.final_answer(), Some("Sorry, I can't do that."));
}

#[tokio::test]
async fn malformed_arguments_become_tool_result_text() {
    let agent = agent(vec![
        LlmResponse::calling("", vec![ToolCallRequest::new("m1", "clock", r#"{"town":"Paris"}"#)]),
        LlmResponse::answer("Let me retry."),
    ]);
    let out = agent.run("Time?").await.unwrap();
    assert_eq!(
        out.messages()[2].content(),
        "Error executing tool clock: validation failed: missing required field: city"
    );
    assert_eq!(out.phase(), Phase::Done);
}

#[tokio::test]
async fn model_failure_is_fatal() {
    let agent = agent(vec![]);
    let err = agent.run("Hi").await.unwrap_err();
    assert!(matches!(err, AgentError::Llm(LlmError::Api(_))));
}

#[tokio::test]
async fn endless_tool_calls_hit_step_limit() {
    let agent = agent(vec![LlmResponse::calling("", vec![clock_call("c", "Paris")])])
        .with_config(LoopConfig { max_steps: 5 });
    let err = agent.run("loop").await.unwrap_err();
    assert!(matches!(err, AgentError::MaxStepsExceeded(5)));
}

#[tokio::test]
async fn empty_state_is_rejected() {
    let agent = agent(vec![LlmResponse::answer("x")]);
    let err = agent
        .run_with(ConversationState::default(), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::EmptyConversation));
}

#[tokio::test]
async fn step_after_done_is_invalid() {
    let agent = agent(vec![LlmResponse::answer("x")]);
    let mut state = ConversationState::new("Hi");
    let event = agent.step(&mut state).await.unwrap();
    assert_eq!(event.next, Phase::Done);
    let err = agent.step(&mut state).await.unwrap_err();
    assert!(matches!(err, AgentError::InvalidTransition(_)));
    assert_eq!(state.len(), 2);
}

#[tokio::test]
async fn step_event_json_shape() {
    let agent = agent(vec![LlmResponse::answer("Hello.")]);
    let mut state = ConversationState::new("Hi");
    let event = agent.step(&mut state).await.unwrap();
    assert_eq!(
        event.to_json(),
        json!({"llm": {"messages": [{"type": "model", "content": "Hello."}]}})
    );
}

#[tokio::test]
async fn keyword_policy_forces_first_call_only() {
    let llm = std::sync::Arc::new(MockLlm::scripted(vec![
        LlmResponse::calling("", vec![clock_call("c1", "Paris")]),
        LlmResponse::answer("noon"),
    ]));
    let agent = ConversationLoop::new(
        Box::new(llm.clone()),
        ToolRegistry::new().with(Box::new(ClockTool)),
    )
    .with_policy(Box::new(KeywordPolicy::new("clock", ["time"])));
    agent.run("What TIME is it in Paris?").await.unwrap();

    let calls = llm.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].policy, ToolPolicy::Force("clock".into()));
    assert_eq!(calls[0].tool_names, vec!["clock".to_string()]);
    assert_eq!(calls[1].policy, ToolPolicy::Auto);
    assert_eq!(calls[1].history.len(), 3);
}
