//! Tool policy: whether the next model call must, may, or must not call a tool.
//!
//! `KeywordPolicy` is the classifier the weather demo uses: a trailing user
//! message that mentions one of its keywords forces the named tool. Anything
//! else (including the follow-up call after tool results) is `Auto`.

use crate::message::Message;

/// Tool policy for one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolPolicy {
    /// Model may answer directly or call any declared tool.
    Auto,
    /// Model must call the named tool.
    Force(String),
    /// Model must not call tools.
    None,
}

impl ToolPolicy {
    pub fn forced_tool(&self) -> Option<&str> {
        match self {
            ToolPolicy::Force(name) => Some(name),
            _ => None,
        }
    }
}

/// Picks the tool policy for the next model call from the history.
///
/// **Interaction**: Held by `ConversationLoop`; consulted once per `llm` step.
pub trait PolicySelector: Send + Sync {
    fn select(&self, history: &[Message]) -> ToolPolicy;
}

/// Always `Auto`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoPolicy;

impl PolicySelector for AutoPolicy {
    fn select(&self, _history: &[Message]) -> ToolPolicy {
        ToolPolicy::Auto
    }
}

/// Forces `tool` when the last message is a user message containing any
/// keyword (case-insensitive substring); otherwise `Auto`.
#[derive(Debug, Clone)]
pub struct KeywordPolicy {
    tool: String,
    keywords: Vec<String>,
}

impl KeywordPolicy {
    pub fn new<I, K>(tool: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            tool: tool.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// True when `text` mentions one of the keywords.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

impl PolicySelector for KeywordPolicy {
    fn select(&self, history: &[Message]) -> ToolPolicy {
        match history.last() {
            Some(Message::User { content }) if self.matches(content) => {
                ToolPolicy::Force(self.tool.clone())
            }
            _ => ToolPolicy::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_policy() -> KeywordPolicy {
        KeywordPolicy::new("get_current_weather", ["weather", "temperature"])
    }

    #[test]
    fn keyword_in_user_message_forces_tool() {
        let history = vec![Message::user("What's the Weather in Paris?")];
        assert_eq!(
            weather_policy().select(&history),
            ToolPolicy::Force("get_current_weather".into())
        );
    }

    #[test]
    fn second_keyword_also_triggers() {
        assert!(weather_policy().matches("what TEMPERATURE is it"));
    }

    #[test]
    fn no_keyword_is_auto() {
        let history = vec![Message::user("Tell me a fun fact about giraffes.")];
        assert_eq!(weather_policy().select(&history), ToolPolicy::Auto);
    }

    #[test]
    fn trailing_tool_result_is_auto() {
        let history = vec![
            Message::user("What's the weather in Paris?"),
            Message::model("", vec![]),
            Message::tool_result("sunny", "call_0"),
        ];
        assert_eq!(weather_policy().select(&history), ToolPolicy::Auto);
    }

    #[test]
    fn empty_history_is_auto() {
        assert_eq!(weather_policy().select(&[]), ToolPolicy::Auto);
    }

    #[test]
    fn forced_tool_accessor() {
        assert_eq!(ToolPolicy::Force("t".into()).forced_tool(), Some("t"));
        assert_eq!(ToolPolicy::Auto.forced_tool(), None);
    }
}
