use serde_json::{Map, Value};
use tracing::{error, info};

use crate::errors::{ChatError, ChatResult};
use crate::models::tool::{ParameterKind, ParameterSpec, ToolCall, ToolDefinition, ToolOutcome};

use super::builtin::{self, BuiltinTool};

/// The authoritative set of invocable tools.
///
/// Entries keep registration order so schema output is stable within a
/// process run. Construct one per process and pass it by reference; there is
/// no global registry.
pub struct ToolRegistry {
    entries: Vec<(ToolDefinition, BuiltinTool)>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            entries: Vec::new(),
        }
    }

    /// A registry pre-loaded with the built-in tool set.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (definition, handler) in builtin::default_tools() {
            registry
                .register(definition, handler)
                .expect("built-in tool names are unique");
        }
        registry
    }

    /// Add a tool. Names are unique within a registry.
    pub fn register(&mut self, definition: ToolDefinition, handler: BuiltinTool) -> ChatResult<()> {
        if self.entries.iter().any(|(d, _)| d.name == definition.name) {
            return Err(ChatError::DuplicateTool(definition.name));
        }
        info!(tool = %definition.name, "registered tool");
        self.entries.push((definition, handler));
        Ok(())
    }

    /// All tool definitions, in registration order.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.entries.iter().map(|(d, _)| d.clone()).collect()
    }

    /// Execute a tool by name, coercing `arguments` to the schema's declared
    /// parameter kinds and applying defaults.
    pub fn execute(&self, name: &str, arguments: &Value) -> ChatResult<Value> {
        let (definition, handler) = self
            .entries
            .iter()
            .find(|(d, _)| d.name == name)
            .ok_or_else(|| ChatError::ToolNotFound(name.to_string()))?;

        let coerced = coerce_arguments(definition, arguments)?;
        handler.invoke(&coerced)
    }

    /// Execute a tool call, folding every failure into an outcome with the
    /// `error` field set. One tool's failure must not abort the conversation.
    pub fn dispatch(&self, call: &ToolCall) -> ToolOutcome {
        match self.execute(&call.name, &call.arguments) {
            Ok(result) => {
                info!(tool = %call.name, "executed tool");
                ToolOutcome::success(&call.name, result)
            }
            Err(e) => {
                error!(tool = %call.name, error = %e, "tool execution failed");
                ToolOutcome::failure(&call.name, e.to_string())
            }
        }
    }
}

fn coerce_arguments(definition: &ToolDefinition, arguments: &Value) -> ChatResult<Map<String, Value>> {
    let empty = Map::new();
    let supplied = match arguments {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(ChatError::InvalidArguments(
                "tool arguments must be an object".to_string(),
            ))
        }
    };

    let mut coerced = Map::new();
    for spec in &definition.parameters {
        match supplied.get(&spec.name) {
            Some(value) => {
                coerced.insert(spec.name.clone(), coerce_value(spec, value)?);
            }
            None if spec.required => {
                return Err(ChatError::InvalidArguments(format!(
                    "missing required parameter `{}`",
                    spec.name
                )));
            }
            None => {
                if let Some(default) = &spec.default {
                    coerced.insert(spec.name.clone(), default.clone());
                }
            }
        }
    }
    Ok(coerced)
}

fn coerce_value(spec: &ParameterSpec, value: &Value) -> ChatResult<Value> {
    let coerced = match spec.kind {
        ParameterKind::String => value.as_str().map(|s| Value::from(s.to_string())),
        ParameterKind::Number => value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
            .map(Value::from),
        ParameterKind::Integer => value
            .as_i64()
            .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
            .map(Value::from),
        ParameterKind::Boolean => value.as_bool().map(Value::from),
    };

    coerced.ok_or_else(|| {
        ChatError::InvalidArguments(format!(
            "parameter `{}` expects a {} value, got {}",
            spec.name,
            spec.kind.as_str(),
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_duplicate() {
        let mut registry = ToolRegistry::with_builtins();
        let (definition, handler) = builtin::default_tools().remove(0);
        let err = registry.register(definition, handler).unwrap_err();
        assert!(matches!(err, ChatError::DuplicateTool(_)));
    }

    #[test]
    fn test_list_is_idempotent_and_ordered() {
        let registry = ToolRegistry::with_builtins();
        let first = registry.list();
        let second = registry.list();
        assert_eq!(first, second);
        let names: Vec<_> = first.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "get_current_time",
                "calculate",
                "get_random_number",
                "convert_temperature",
                "get_weather",
            ]
        );
    }

    #[test]
    fn test_execute_unknown_tool() {
        let registry = ToolRegistry::with_builtins();
        let err = registry.execute("launch_rocket", &json!({})).unwrap_err();
        assert!(matches!(err, ChatError::ToolNotFound(_)));
    }

    #[test]
    fn test_execute_missing_required_parameter() {
        let registry = ToolRegistry::with_builtins();
        let err = registry.execute("calculate", &json!({})).unwrap_err();
        assert!(matches!(err, ChatError::InvalidArguments(_)));
    }

    #[test]
    fn test_execute_applies_defaults() {
        let registry = ToolRegistry::with_builtins();
        let result = registry.execute("get_current_time", &json!({})).unwrap();
        assert!(result.as_str().unwrap().starts_with("Current time in UTC: "));
    }

    #[test]
    fn test_execute_coerces_numeric_strings() {
        let registry = ToolRegistry::with_builtins();
        let result = registry
            .execute(
                "convert_temperature",
                &json!({"value": "0", "from_unit": "celsius", "to_unit": "kelvin"}),
            )
            .unwrap();
        assert_eq!(result["converted_value"], json!(273.15));
    }

    #[test]
    fn test_execute_rejects_uncoercible_value() {
        let registry = ToolRegistry::with_builtins();
        let err = registry
            .execute(
                "convert_temperature",
                &json!({"value": true, "from_unit": "celsius", "to_unit": "kelvin"}),
            )
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidArguments(_)));
    }

    #[test]
    fn test_dispatch_folds_errors() {
        let registry = ToolRegistry::with_builtins();
        let outcome = registry.dispatch(&ToolCall::new("calculate", json!({"expression": "2+2"})));
        assert!(!outcome.is_error());
        assert_eq!(outcome.result, Some(json!(4.0)));

        let outcome = registry.dispatch(&ToolCall::new("nope", json!({})));
        assert!(outcome.is_error());
        assert_eq!(outcome.tool_name, "nope");
        assert!(outcome.result.is_none());
    }
}
