use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::message::Message;
use crate::models::tool::ToolCall;

/// One model turn: text and/or the tool calls the model wants executed.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    /// A plain text completion with no tool calls
    pub fn text<S: Into<String>>(content: S) -> Self {
        Completion {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// The model capability the orchestrator depends on.
///
/// `tool_schemas` carries function schemas from the translator; with
/// `allow_tools` set the model decides autonomously whether to answer in
/// text or request tool calls, and returning zero tool calls is valid.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(
        &self,
        messages: &[Message],
        tool_schemas: &[Value],
        allow_tools: bool,
    ) -> Result<Completion>;
}
