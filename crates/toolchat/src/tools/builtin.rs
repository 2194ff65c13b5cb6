//! The built-in tool set: a closed enum of handlers, one variant per tool,
//! so dispatch stays exhaustive at compile time.

use chrono::Utc;
use rand::Rng;
use serde_json::{json, Map, Value};

use crate::errors::{ChatError, ChatResult};
use crate::models::tool::{ParameterKind, ParameterSpec, ToolDefinition};

use super::calc;

const WEATHER_CONDITIONS: [&str; 5] = ["Sunny", "Cloudy", "Rainy", "Partly Cloudy", "Snowy"];

/// Handler for one built-in tool. Arguments arrive already coerced to the
/// schema's declared kinds, with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTool {
    CurrentTime,
    Calculate,
    RandomNumber,
    ConvertTemperature,
    Weather,
}

impl BuiltinTool {
    pub fn invoke(&self, arguments: &Map<String, Value>) -> ChatResult<Value> {
        match self {
            BuiltinTool::CurrentTime => current_time(arguments),
            BuiltinTool::Calculate => calculate(arguments),
            BuiltinTool::RandomNumber => random_number(arguments),
            BuiltinTool::ConvertTemperature => convert_temperature(arguments),
            BuiltinTool::Weather => weather(arguments),
        }
    }
}

/// The default tool set, paired with the schemas the registry advertises.
pub fn default_tools() -> Vec<(ToolDefinition, BuiltinTool)> {
    vec![
        (
            ToolDefinition::new(
                "get_current_time",
                "Get the current date and time",
                vec![ParameterSpec::optional(
                    "timezone",
                    ParameterKind::String,
                    "Timezone (e.g., 'UTC', 'America/New_York')",
                    json!("UTC"),
                )],
            ),
            BuiltinTool::CurrentTime,
        ),
        (
            ToolDefinition::new(
                "calculate",
                "Perform basic mathematical calculations",
                vec![ParameterSpec::required(
                    "expression",
                    ParameterKind::String,
                    "Mathematical expression to evaluate",
                )],
            ),
            BuiltinTool::Calculate,
        ),
        (
            ToolDefinition::new(
                "get_random_number",
                "Generate a random number within a range",
                vec![
                    ParameterSpec::optional(
                        "min",
                        ParameterKind::Number,
                        "Minimum value",
                        json!(0),
                    ),
                    ParameterSpec::optional(
                        "max",
                        ParameterKind::Number,
                        "Maximum value",
                        json!(100),
                    ),
                ],
            ),
            BuiltinTool::RandomNumber,
        ),
        (
            ToolDefinition::new(
                "convert_temperature",
                "Convert temperature between Celsius, Fahrenheit, and Kelvin",
                vec![
                    ParameterSpec::required(
                        "value",
                        ParameterKind::Number,
                        "Temperature value to convert",
                    ),
                    ParameterSpec::required(
                        "from_unit",
                        ParameterKind::String,
                        "Source temperature unit",
                    ),
                    ParameterSpec::required(
                        "to_unit",
                        ParameterKind::String,
                        "Target temperature unit",
                    ),
                ],
            ),
            BuiltinTool::ConvertTemperature,
        ),
        (
            ToolDefinition::new(
                "get_weather",
                "Get mock weather information for a city",
                vec![ParameterSpec::required(
                    "city",
                    ParameterKind::String,
                    "City name",
                )],
            ),
            BuiltinTool::Weather,
        ),
    ]
}

// Known quirk, kept for wire compatibility: the timezone argument is only
// echoed into the label, the clock itself always reads UTC.
fn current_time(arguments: &Map<String, Value>) -> ChatResult<Value> {
    let timezone = arguments
        .get("timezone")
        .and_then(|v| v.as_str())
        .unwrap_or("UTC");
    Ok(json!(format!(
        "Current time in {}: {}",
        timezone,
        Utc::now().to_rfc3339()
    )))
}

fn calculate(arguments: &Map<String, Value>) -> ChatResult<Value> {
    let expression = require_str(arguments, "expression")?;
    let result = calc::evaluate(expression)?;
    Ok(json!(result))
}

fn random_number(arguments: &Map<String, Value>) -> ChatResult<Value> {
    let min = arguments.get("min").and_then(|v| v.as_f64()).unwrap_or(0.0) as i64;
    let max = arguments
        .get("max")
        .and_then(|v| v.as_f64())
        .unwrap_or(100.0) as i64;
    if min > max {
        return Err(ChatError::InvalidArguments(format!(
            "min ({min}) must not exceed max ({max})"
        )));
    }
    let value = rand::thread_rng().gen_range(min..=max);
    Ok(json!(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TempUnit {
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TempUnit {
    fn parse(text: &str) -> ChatResult<Self> {
        match text.to_lowercase().as_str() {
            "celsius" => Ok(TempUnit::Celsius),
            "fahrenheit" => Ok(TempUnit::Fahrenheit),
            "kelvin" => Ok(TempUnit::Kelvin),
            other => Err(ChatError::InvalidArguments(format!(
                "Invalid temperature unit: {other}"
            ))),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "celsius",
            TempUnit::Fahrenheit => "fahrenheit",
            TempUnit::Kelvin => "kelvin",
        }
    }

    fn to_celsius(&self, value: f64) -> f64 {
        match self {
            TempUnit::Celsius => value,
            TempUnit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TempUnit::Kelvin => value - 273.15,
        }
    }

    fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TempUnit::Celsius => celsius,
            TempUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TempUnit::Kelvin => celsius + 273.15,
        }
    }
}

// Conversion always pivots through Celsius; results are rounded to 2 decimals.
fn convert_temperature(arguments: &Map<String, Value>) -> ChatResult<Value> {
    let value = require_f64(arguments, "value")?;
    let from_unit = TempUnit::parse(require_str(arguments, "from_unit")?)?;
    let to_unit = TempUnit::parse(require_str(arguments, "to_unit")?)?;

    let converted = to_unit.from_celsius(from_unit.to_celsius(value));

    Ok(json!({
        "original_value": value,
        "original_unit": from_unit.as_str(),
        "converted_value": (converted * 100.0).round() / 100.0,
        "converted_unit": to_unit.as_str(),
    }))
}

// Fabricated data on purpose; there is no weather backend behind this.
fn weather(arguments: &Map<String, Value>) -> ChatResult<Value> {
    let city = require_str(arguments, "city")?;
    let mut rng = rand::thread_rng();

    Ok(json!({
        "city": city,
        "temperature": rng.gen_range(-10..=35),
        "unit": "celsius",
        "condition": WEATHER_CONDITIONS[rng.gen_range(0..WEATHER_CONDITIONS.len())],
        "humidity": rng.gen_range(30..=90),
        "wind_speed": rng.gen_range(0..=30),
        "note": "This is mock weather data for demonstration purposes",
    }))
}

fn require_str<'a>(arguments: &'a Map<String, Value>, name: &str) -> ChatResult<&'a str> {
    arguments
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ChatError::InvalidArguments(format!("missing string parameter `{name}`")))
}

fn require_f64(arguments: &Map<String, Value>, name: &str) -> ChatResult<f64> {
    arguments
        .get(name)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ChatError::InvalidArguments(format!("missing numeric parameter `{name}`")))
}
