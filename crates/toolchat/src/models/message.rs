use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::role::Role;

/// A message to or from the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Auxiliary data: which tools an assistant message requested
    /// (`tool_calls`), or which tool produced a tool message (`tool_name`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    /// Create a new message with the current timestamp
    pub fn new<S: Into<String>>(role: Role, content: S) -> Self {
        Message {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Message::new(Role::User, content)
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Message::new(Role::Assistant, content)
    }

    pub fn system<S: Into<String>>(content: S) -> Self {
        Message::new(Role::System, content)
    }

    pub fn tool<S: Into<String>>(content: S) -> Self {
        Message::new(Role::Tool, content)
    }

    /// Attach metadata to the message
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The tool calls recorded on an assistant message, if any
    pub fn tool_calls(&self) -> Option<&Vec<Value>> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("tool_calls"))
            .and_then(|v| v.as_array())
    }

    /// The producing tool recorded on a tool message, if any
    pub fn tool_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("tool_name"))
            .and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_builders() {
        let message = Message::user("hi");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "hi");
        assert!(message.metadata.is_none());

        let message = Message::tool("42").with_metadata(json!({"tool_name": "calculate"}));
        assert_eq!(message.role, Role::Tool);
        assert_eq!(message.tool_name(), Some("calculate"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let message = Message::assistant("ok");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_tool_calls_accessor() {
        let message = Message::assistant("").with_metadata(json!({
            "tool_calls": [{"name": "get_weather", "arguments": {"city": "Paris"}}]
        }));
        let calls = message.tool_calls().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["name"], "get_weather");
    }
}
