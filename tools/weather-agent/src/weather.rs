//! `get_current_weather`: a mock weather lookup keyed by city and date.
//!
//! **Interaction**: Registered in the `ToolRegistry` built by `build_loop`;
//! `ConversationLoop` dispatches the model's tool calls to it.

use serde::Deserialize;
use serde_json::{json, Value};
use toolgraph::{Tool, ToolError};
use tracing::info;

/// Tool name the model calls and the keyword policy forces.
pub const WEATHER_TOOL_NAME: &str = "get_current_weather";

/// Date the canned "today" answers are keyed on unless configured otherwise.
pub const DEFAULT_TODAY: &str = "2025-06-19";

/// How the tool decides what "today" is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodayMode {
    /// A fixed `YYYY-MM-DD` date; keeps the demo output reproducible.
    Fixed(String),
    /// The machine's local date at call time.
    System,
}

impl Default for TodayMode {
    fn default() -> Self {
        TodayMode::Fixed(DEFAULT_TODAY.to_string())
    }
}

impl TodayMode {
    pub fn resolve(&self) -> String {
        match self {
            TodayMode::Fixed(date) => date.clone(),
            TodayMode::System => chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Typed input of the weather tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeatherInput {
    /// The city and state, e.g. San Francisco, CA.
    pub location: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

/// Canned answer for `location` on `date`, where `today` is the reference date.
///
/// Cities are matched by case-insensitive substring, first match wins.
pub fn lookup(location: &str, date: &str, today: &str) -> String {
    let place = location.to_lowercase();
    let is_today = date == today;
    if place.contains("san francisco") {
        if is_today {
            format!("The weather in {location} today ({date}) is sunny with a temperature of 70°F.")
        } else {
            format!("I don't have historical/future weather data for {location} on {date}. But San Francisco is generally mild.")
        }
    } else if place.contains("new york") {
        if is_today {
            format!("The weather in {location} today ({date}) is cloudy with a temperature of 65°F with a chance of rain.")
        } else {
            format!("I don't have historical/future weather data for {location} on {date}. New York can be unpredictable.")
        }
    } else if place.contains("mason, ohio") {
        if is_today {
            format!("The weather in {location} today ({date}) is 75°F and partly cloudy.")
        } else {
            format!("I don't have historical/future weather data for Mason, Ohio on {date}.")
        }
    } else {
        format!("Sorry, I don't have weather information for {location}.")
    }
}

/// Mock weather tool.
#[derive(Debug, Clone, Default)]
pub struct WeatherTool {
    today: TodayMode,
}

impl WeatherTool {
    pub fn new(today: TodayMode) -> Self {
        Self { today }
    }
}

impl Tool for WeatherTool {
    fn name(&self) -> &str {
        WEATHER_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Fetches the current weather for a specified location and date."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g., San Francisco, CA"
                },
                "date": {
                    "type": "string",
                    "description": "The date for which to get the weather, in YYYY-MM-DD format (e.g., 2025-06-19)"
                }
            },
            "required": ["location", "date"]
        })
    }

    fn invoke(&self, args: Value) -> Result<String, ToolError> {
        let input: WeatherInput = serde_json::from_value(args)
            .map_err(|e| ToolError::ValidationFailed(e.to_string()))?;
        info!(location = %input.location, date = %input.date, "get_current_weather called");
        Ok(lookup(&input.location, &input.date, &self.today.resolve()))
    }
}
