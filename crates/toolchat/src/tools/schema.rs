//! Translation between registry tool definitions and the model-facing
//! function schema: `{name, description, parameters: {type: "object",
//! properties, required}}`. Pure functions, no state.

use serde_json::{json, Map, Value};

use crate::errors::{ChatError, ChatResult};
use crate::models::tool::{ParameterKind, ParameterSpec, ToolDefinition};

/// Render a definition as a callable-function schema. Parameter order is
/// preserved so repeated renders are byte-identical.
pub fn to_function_schema(definition: &ToolDefinition) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for spec in &definition.parameters {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(spec.kind.as_str()));
        property.insert("description".to_string(), json!(spec.description));
        if let Some(default) = &spec.default {
            property.insert("default".to_string(), default.clone());
        }
        properties.insert(spec.name.clone(), Value::Object(property));

        if spec.required {
            required.push(spec.name.clone());
        }
    }

    json!({
        "name": definition.name,
        "description": definition.description,
        "parameters": {
            "type": "object",
            "properties": properties,
            "required": required,
        }
    })
}

/// Parse a callable-function schema back into a definition.
pub fn from_function_schema(schema: &Value) -> ChatResult<ToolDefinition> {
    let name = schema
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ChatError::InvalidArguments("function schema missing name".to_string()))?;
    let description = schema
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    let parameters = schema.get("parameters").unwrap_or(&Value::Null);
    let properties = parameters
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();
    let required: Vec<&str> = parameters
        .get("required")
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let mut specs = Vec::new();
    for (param_name, property) in &properties {
        let kind = match property.get("type").and_then(|v| v.as_str()) {
            Some("string") => ParameterKind::String,
            Some("number") => ParameterKind::Number,
            Some("integer") => ParameterKind::Integer,
            Some("boolean") => ParameterKind::Boolean,
            other => {
                return Err(ChatError::InvalidArguments(format!(
                    "parameter `{}` has unsupported type {:?}",
                    param_name, other
                )))
            }
        };
        specs.push(ParameterSpec {
            name: param_name.clone(),
            kind,
            description: property
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            default: property.get("default").cloned(),
            required: required.contains(&param_name.as_str()),
        });
    }

    Ok(ToolDefinition::new(name, description, specs))
}
