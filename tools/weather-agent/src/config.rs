//! Configuration: API credential, endpoint, model, reference date, step limit.
//!
//! **Interaction**: Used by `main` to build the LLM client and the loop.
//! Loads from the environment via `WeatherAgentConfig::from_env`; the caller
//! should run `dotenv::dotenv().ok()` first.

use thiserror::Error;
use toolgraph::llm::GEMINI_OPENAI_BASE;
use toolgraph::{LoopConfig, OpenAiCompatConfig};

use crate::weather::TodayMode;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Errors while resolving configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY not set (put it in .env or the environment)")]
    MissingApiKey,
    #[error("GEMINI_API_KEY is empty (check .env: no spaces, whole key on one line)")]
    EmptyApiKey,
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Resolved configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherAgentConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub today: TodayMode,
    pub max_steps: usize,
}

impl WeatherAgentConfig {
    /// Resolves config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves config through `lookup` (name → value).
    ///
    /// `WEATHER_TODAY` takes a `YYYY-MM-DD` date or the literal `system`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = lookup("GEMINI_API_KEY")
            .ok_or(ConfigError::MissingApiKey)?
            .trim()
            .to_string();
        if api_key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        let api_base = get("GEMINI_API_BASE")
            .unwrap_or_else(|| GEMINI_OPENAI_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = match get("GEMINI_TEMPERATURE") {
            Some(v) => v.parse::<f32>().map_err(|_| ConfigError::Invalid {
                name: "GEMINI_TEMPERATURE",
                value: v,
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        let today = match get("WEATHER_TODAY") {
            None => TodayMode::default(),
            Some(v) if v.eq_ignore_ascii_case("system") => TodayMode::System,
            Some(v) => {
                if chrono::NaiveDate::parse_from_str(&v, "%Y-%m-%d").is_err() {
                    return Err(ConfigError::Invalid {
                        name: "WEATHER_TODAY",
                        value: v,
                    });
                }
                TodayMode::Fixed(v)
            }
        };

        let max_steps = match get("AGENT_MAX_STEPS") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "AGENT_MAX_STEPS",
                        value: v,
                    })
                }
            },
            None => LoopConfig::default().max_steps,
        };

        Ok(Self {
            api_key,
            api_base,
            model,
            temperature,
            today,
            max_steps,
        })
    }

    /// Client settings for the chat endpoint.
    pub fn llm_config(&self) -> OpenAiCompatConfig {
        OpenAiCompatConfig::new(self.api_key.clone())
            .with_api_base(self.api_base.clone())
            .with_model(self.model.clone())
            .with_temperature(Some(self.temperature))
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            max_steps: self.max_steps,
        }
    }
}
