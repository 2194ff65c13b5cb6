//! The chat turn state machine: resolve the conversation, ask the model,
//! dispatch any requested tools, then ask the model again for the final
//! user-facing answer.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::conversation::ConversationStore;
use crate::errors::{ChatError, ChatResult};
use crate::models::message::Message;
use crate::models::role::Role;
use crate::providers::base::{Completion, Provider};
use crate::tools::schema;
use crate::tools::ToolRegistry;

/// The outcome of one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: String,
    /// Names of every tool dispatched this turn, in dispatch order; absent
    /// when no tools ran
    pub tools_used: Option<Vec<String>>,
}

/// Ties the provider, tool registry and conversation store together.
/// Constructed once at process start and shared by reference; there is no
/// global state behind it.
pub struct Orchestrator {
    provider: Box<dyn Provider>,
    registry: ToolRegistry,
    store: ConversationStore,
}

impl Orchestrator {
    pub fn new(provider: Box<dyn Provider>, registry: ToolRegistry, store: ConversationStore) -> Self {
        Self {
            provider,
            registry,
            store,
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Run one chat turn.
    ///
    /// An unknown or absent conversation id silently starts a new
    /// conversation. On failure the turn is aborted but nothing already
    /// appended is rolled back: the conversation keeps the user message even
    /// when the assistant's reply never arrives.
    pub async fn chat(
        &self,
        message: &str,
        conversation_id: Option<&str>,
        use_tools: bool,
    ) -> ChatResult<ChatReply> {
        let conversation_id = self.resolve_conversation(conversation_id);

        // One turn at a time per conversation; turns on other conversations
        // proceed concurrently.
        let turn_lock = self.store.turn_lock(&conversation_id);
        let _turn = turn_lock.lock().await;

        self.store
            .append(&conversation_id, Role::User, message, None)?;
        let history = self.history(&conversation_id)?;

        let mut tools_used = Vec::new();
        let response = if use_tools {
            let schemas: Vec<Value> = self
                .registry
                .list()
                .iter()
                .map(schema::to_function_schema)
                .collect();

            let first_pass = self
                .provider
                .generate(&history, &schemas, true)
                .await
                .map_err(|e| ChatError::ModelError(e.to_string()))?;

            if first_pass.has_tool_calls() {
                self.dispatch_tool_calls(&conversation_id, &first_pass, &mut tools_used)?;

                // The second pass runs tool-free: the reply must come from
                // the appended tool results, never a raw tool-call echo.
                let history = self.history(&conversation_id)?;
                let final_pass = self
                    .provider
                    .generate(&history, &[], false)
                    .await
                    .map_err(|e| ChatError::ModelError(e.to_string()))?;
                final_pass.content
            } else {
                first_pass.content
            }
        } else {
            let completion = self
                .provider
                .generate(&history, &[], false)
                .await
                .map_err(|e| ChatError::ModelError(e.to_string()))?;
            completion.content
        };

        self.store
            .append(&conversation_id, Role::Assistant, &response, None)?;

        info!(
            conversation = %conversation_id,
            tools = tools_used.len(),
            "completed chat turn"
        );
        Ok(ChatReply {
            response,
            conversation_id,
            tools_used: if tools_used.is_empty() {
                None
            } else {
                Some(tools_used)
            },
        })
    }

    fn resolve_conversation(&self, conversation_id: Option<&str>) -> String {
        match conversation_id {
            Some(id) if self.store.get(id).is_some() => id.to_string(),
            Some(id) => {
                warn!(conversation = %id, "unknown conversation id, starting fresh");
                self.store.create()
            }
            None => self.store.create(),
        }
    }

    // Record the model's tool-call request, then dispatch each call in the
    // order the model returned. Later calls may rely on earlier ones, so
    // dispatch stays sequential.
    fn dispatch_tool_calls(
        &self,
        conversation_id: &str,
        first_pass: &Completion,
        tools_used: &mut Vec<String>,
    ) -> ChatResult<()> {
        let requested: Vec<Value> = first_pass
            .tool_calls
            .iter()
            .map(|call| json!({"name": call.name, "arguments": call.arguments}))
            .collect();
        self.store.append(
            conversation_id,
            Role::Assistant,
            &first_pass.content,
            Some(json!({ "tool_calls": requested })),
        )?;

        for call in &first_pass.tool_calls {
            let outcome = self.registry.dispatch(call);
            tools_used.push(call.name.clone());

            // A failed call is reported through tools_used alone; no tool
            // message is appended for it.
            if !outcome.is_error() {
                let content = match outcome.result {
                    Some(Value::String(text)) => text,
                    Some(value) => value.to_string(),
                    None => String::new(),
                };
                self.store.append(
                    conversation_id,
                    Role::Tool,
                    content,
                    Some(json!({ "tool_name": outcome.tool_name })),
                )?;
            }
        }
        Ok(())
    }

    fn history(&self, conversation_id: &str) -> ChatResult<Vec<Message>> {
        self.store
            .messages(conversation_id)
            .ok_or_else(|| ChatError::ConversationNotFound(conversation_id.to_string()))
    }
}
