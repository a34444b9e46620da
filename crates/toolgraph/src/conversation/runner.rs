//! Conversation loop runner: one `step` per node, `run` until done.

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::conversation::phase::{NodeKind, Phase};
use crate::conversation::state::ConversationState;
use crate::error::AgentError;
use crate::llm::{AutoPolicy, LlmClient, PolicySelector};
use crate::message::{Message, ToolCallRequest};
use crate::tool::{ToolRegistry, ToolSpec};

/// Loop limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Maximum node executions per conversation.
    pub max_steps: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { max_steps: 25 }
    }
}

/// What one step did: the node that ran, what it appended, and where the
/// loop goes next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepEvent {
    pub node: NodeKind,
    /// Tool calls the `tool` node executed, in order; empty for `llm` steps.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub executed: Vec<ToolCallRequest>,
    pub messages: Vec<Message>,
    pub next: Phase,
}

impl StepEvent {
    /// `{"<node>": {"messages": [...]}}`, the shape printed per step by the demo.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            self.node.as_str().to_string(),
            json!({ "messages": self.messages }),
        );
        Value::Object(map)
    }

    /// True when an `llm` step routed to the tool node.
    pub fn continues_to_tool(&self) -> bool {
        self.node == NodeKind::Llm && self.next == Phase::AwaitingTool
    }
}

/// Conversation loop: model node and tool node with a routing function between them.
///
/// Holds the model invoker, the tool registry, and the policy selector. One
/// instance can run many conversations in sequence; each run owns its own
/// `ConversationState`.
///
/// **Interaction**: Built by the caller with an `LlmClient` (e.g.
/// `OpenAiCompatClient`, `MockLlm`) and a `ToolRegistry`; drives `route`.
pub struct ConversationLoop {
    llm: Box<dyn LlmClient>,
    tools: ToolRegistry,
    specs: Vec<ToolSpec>,
    policy: Box<dyn PolicySelector>,
    config: LoopConfig,
}

impl ConversationLoop {
    /// Builds a loop with `Auto` tool policy and default limits.
    pub fn new(llm: Box<dyn LlmClient>, tools: ToolRegistry) -> Self {
        let specs = tools.specs();
        Self {
            llm,
            tools,
            specs,
            policy: Box::new(AutoPolicy),
            config: LoopConfig::default(),
        }
    }

    pub fn with_policy(mut self, policy: Box<dyn PolicySelector>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the node for the current phase and appends its output.
    ///
    /// `llm`: selects the tool policy, calls the model, appends the reply.
    /// `tool`: dispatches the pending calls in order, appends one result each.
    /// Fails with `InvalidTransition` when the conversation is already done.
    pub async fn step(&self, state: &mut ConversationState) -> Result<StepEvent, AgentError> {
        match state.phase() {
            Phase::AwaitingModel => {
                let policy = self.policy.select(state.messages());
                debug!(?policy, history = state.len(), "node llm");
                let reply: Message = self
                    .llm
                    .generate(state.messages(), &self.specs, &policy)
                    .await?
                    .into();
                state.push(reply.clone());
                let next = state.phase();
                match next {
                    Phase::AwaitingTool => {
                        debug!(tool_calls = reply.tool_calls().len(), "route: continue")
                    }
                    _ => debug!("route: end"),
                }
                Ok(StepEvent {
                    node: NodeKind::Llm,
                    executed: vec![],
                    messages: vec![reply],
                    next,
                })
            }
            Phase::AwaitingTool => {
                let calls = state.pending_tool_calls().to_vec();
                debug!(tool_calls = calls.len(), "node tool");
                let results: Vec<Message> = calls.iter().map(|c| self.tools.dispatch(c)).collect();
                for r in &results {
                    state.push(r.clone());
                }
                Ok(StepEvent {
                    node: NodeKind::Tool,
                    executed: calls,
                    messages: results,
                    next: state.phase(),
                })
            }
            Phase::Done => Err(AgentError::InvalidTransition(
                "conversation already has a final answer".into(),
            )),
        }
    }

    /// Runs a new conversation seeded with `user_text` until it is done.
    pub async fn run(&self, user_text: impl Into<String>) -> Result<ConversationState, AgentError> {
        self.run_with(ConversationState::new(user_text), |_| {}).await
    }

    /// Steps `state` until `Done`, calling `observer` after every step.
    ///
    /// Fails with `MaxStepsExceeded` once `max_steps` node executions have run
    /// without reaching `Done`, and with the model error if a model call fails.
    pub async fn run_with<F>(
        &self,
        mut state: ConversationState,
        mut observer: F,
    ) -> Result<ConversationState, AgentError>
    where
        F: FnMut(&StepEvent),
    {
        if state.is_empty() {
            return Err(AgentError::EmptyConversation);
        }
        let mut steps = 0;
        while state.phase() != Phase::Done {
            if steps >= self.config.max_steps {
                return Err(AgentError::MaxStepsExceeded(self.config.max_steps));
            }
            let event = self.step(&mut state).await?;
            steps += 1;
            observer(&event);
        }
        info!(steps, messages = state.len(), "conversation done");
        Ok(state)
    }
}
