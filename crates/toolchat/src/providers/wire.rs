//! Conversion between the internal message/tool structs and the
//! OpenAI-compatible chat-completions wire format.

use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use crate::models::message::Message;
use crate::models::role::Role;
use crate::models::tool::ToolCall;

use super::base::Completion;

/// Convert internal messages to the chat-completions message spec.
///
/// Tool messages carry the `tool_call_id`/`name` pair derived from the
/// producing tool; assistant messages replay their recorded tool calls so
/// the model sees the full request/response exchange on the next pass.
pub fn messages_to_wire(messages: &[Message]) -> Vec<Value> {
    let mut wire = Vec::new();

    for message in messages {
        let mut converted = json!({
            "role": message.role,
            "content": message.content,
        });

        match message.role {
            Role::Tool => {
                if let Some(tool_name) = message.tool_name() {
                    converted["tool_call_id"] = json!(format!("call_{tool_name}"));
                    converted["name"] = json!(tool_name);
                }
            }
            Role::Assistant => {
                if let Some(calls) = message.tool_calls() {
                    let replayed: Vec<Value> = calls
                        .iter()
                        .map(|call| {
                            let name = call.get("name").and_then(|v| v.as_str()).unwrap_or_default();
                            let arguments = call.get("arguments").cloned().unwrap_or(json!({}));
                            json!({
                                "id": format!("call_{name}"),
                                "type": "function",
                                "function": {
                                    "name": name,
                                    "arguments": arguments.to_string(),
                                }
                            })
                        })
                        .collect();
                    converted["tool_calls"] = json!(replayed);
                }
            }
            Role::User | Role::System => {}
        }

        wire.push(converted);
    }

    wire
}

/// Wrap translator function schemas into the `tools` request parameter.
pub fn tools_to_wire(schemas: &[Value]) -> Vec<Value> {
    schemas
        .iter()
        .map(|schema| {
            json!({
                "type": "function",
                "function": schema,
            })
        })
        .collect()
}

/// Parse a chat-completions response into a Completion.
pub fn completion_from_response(response: &Value) -> Result<Completion> {
    let message = response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| anyhow!("response has no choices"))?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(|v| v.as_array()) {
        for call in calls {
            let name = call["function"]["name"]
                .as_str()
                .ok_or_else(|| anyhow!("tool call has no function name"))?;
            let raw_arguments = call["function"]["arguments"].as_str().unwrap_or_default();
            let arguments = if raw_arguments.is_empty() {
                json!({})
            } else {
                serde_json::from_str(raw_arguments).map_err(|e| {
                    anyhow!("could not parse arguments for tool call '{name}': {e}")
                })?
            };
            tool_calls.push(ToolCall::new(name, arguments));
        }
    }

    Ok(Completion {
        content,
        tool_calls,
    })
}
