use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The primitive type a tool parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParameterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::String => "string",
            ParameterKind::Number => "number",
            ParameterKind::Integer => "integer",
            ParameterKind::Boolean => "boolean",
        }
    }
}

/// One named parameter in a tool's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub required: bool,
}

impl ParameterSpec {
    pub fn required<N, D>(name: N, kind: ParameterKind, description: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ParameterSpec {
            name: name.into(),
            kind,
            description: description.into(),
            default: None,
            required: true,
        }
    }

    pub fn optional<N, D>(name: N, kind: ParameterKind, description: D, default: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ParameterSpec {
            name: name.into(),
            kind,
            description: description.into(),
            default: Some(default),
            required: false,
        }
    }
}

/// A tool that can be offered to a model. The schema declares every
/// parameter the handler reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The name of the tool, unique within a registry
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// Parameters that the tool accepts, in declaration order
    pub parameters: Vec<ParameterSpec>,
}

impl ToolDefinition {
    pub fn new<N, D>(name: N, description: D, parameters: Vec<ParameterSpec>) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolDefinition {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool call requested by the model. Neither the name nor the arguments
/// are trusted until the registry validates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// The name of the tool to execute
    pub name: String,
    /// The arguments for the execution
    pub arguments: Value,
}

impl ToolCall {
    pub fn new<S: Into<String>>(name: S, arguments: Value) -> Self {
        ToolCall {
            name: name.into(),
            arguments,
        }
    }
}

/// The outcome of one tool invocation: a value or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub tool_name: String,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn success<S: Into<String>>(tool_name: S, result: Value) -> Self {
        ToolOutcome {
            tool_name: tool_name.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure<S: Into<String>, E: Into<String>>(tool_name: S, error: E) -> Self {
        ToolOutcome {
            tool_name: tool_name.into(),
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
