//! Conversation loop: an explicit two-node state machine.
//!
//! ```text
//! __start__ -> llm --(tool calls)--> tool -> llm ...
//!               \--(no tool calls)--> __end__
//! ```
//!
//! `route` is the pure transition function; `ConversationLoop::step` runs the
//! node for the current phase and `ConversationLoop::run` repeats until `Done`.

mod phase;
mod runner;
mod state;

pub use phase::{route, NodeKind, Phase};
pub use runner::{ConversationLoop, LoopConfig, StepEvent};
pub use state::ConversationState;
