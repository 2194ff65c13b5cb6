//! In-memory conversation store. Process-lifetime only; nothing survives a
//! restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::{ChatError, ChatResult};
use crate::models::message::Message;
use crate::models::role::Role;

/// An ordered message history for one chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Diagnostic view of a conversation, for listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
}

/// Conversations keyed by an opaque identifier.
///
/// All operations are short and synchronous. The store also hands out a
/// per-conversation turn lock so the orchestrator can serialize whole chat
/// turns on one conversation while turns on different conversations proceed
/// concurrently.
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
    turn_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        ConversationStore {
            conversations: RwLock::new(HashMap::new()),
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Store an empty conversation under a fresh random identifier.
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let conversation = Conversation {
            id: id.clone(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.conversations
            .write()
            .expect("conversation store lock poisoned")
            .insert(id.clone(), conversation);
        info!(conversation = %id, "created conversation");
        id
    }

    /// Look up a conversation. Absence is a recoverable condition, not an
    /// error; chat callers fall back to creating a new conversation.
    pub fn get(&self, id: &str) -> Option<Conversation> {
        self.conversations
            .read()
            .expect("conversation store lock poisoned")
            .get(id)
            .cloned()
    }

    /// Append a message and bump the conversation's updated timestamp.
    pub fn append(
        &self,
        id: &str,
        role: Role,
        content: impl Into<String>,
        metadata: Option<Value>,
    ) -> ChatResult<()> {
        let mut conversations = self
            .conversations
            .write()
            .expect("conversation store lock poisoned");
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| ChatError::ConversationNotFound(id.to_string()))?;

        let mut message = Message::new(role, content);
        message.metadata = metadata;
        conversation.messages.push(message);
        conversation.updated_at = Utc::now();
        Ok(())
    }

    /// The messages of a conversation, or None when the id is unknown.
    pub fn messages(&self, id: &str) -> Option<Vec<Message>> {
        self.conversations
            .read()
            .expect("conversation store lock poisoned")
            .get(id)
            .map(|c| c.messages.clone())
    }

    /// Remove a conversation, reporting whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        let existed = self
            .conversations
            .write()
            .expect("conversation store lock poisoned")
            .remove(id)
            .is_some();
        if existed {
            self.turn_locks
                .lock()
                .expect("turn lock table poisoned")
                .remove(id);
            info!(conversation = %id, "deleted conversation");
        }
        existed
    }

    /// Summaries of every stored conversation, for diagnostics.
    pub fn list(&self) -> Vec<ConversationSummary> {
        self.conversations
            .read()
            .expect("conversation store lock poisoned")
            .values()
            .map(|c| ConversationSummary {
                id: c.id.clone(),
                created_at: c.created_at,
                updated_at: c.updated_at,
                message_count: c.messages.len(),
            })
            .collect()
    }

    /// The turn lock for a conversation, created on first use. Held across a
    /// whole chat turn so concurrent turns on one conversation cannot
    /// interleave their tool-call/tool-result pairing.
    pub fn turn_lock(&self, id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.turn_locks
            .lock()
            .expect("turn lock table poisoned")
            .entry(id.to_string())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_and_append() {
        let store = ConversationStore::new();
        let id = store.create();

        store.append(&id, Role::User, "hi", None).unwrap();

        let messages = store.messages(&id).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "hi");
    }

    #[test]
    fn test_append_unknown_conversation() {
        let store = ConversationStore::new();
        let err = store.append("missing", Role::User, "hi", None).unwrap_err();
        assert!(matches!(err, ChatError::ConversationNotFound(_)));
    }

    #[test]
    fn test_append_updates_timestamp_and_metadata() {
        let store = ConversationStore::new();
        let id = store.create();
        let created = store.get(&id).unwrap().created_at;

        store
            .append(&id, Role::Tool, "42", Some(json!({"tool_name": "calculate"})))
            .unwrap();

        let conversation = store.get(&id).unwrap();
        assert!(conversation.updated_at >= created);
        assert_eq!(conversation.messages[0].tool_name(), Some("calculate"));
    }

    #[test]
    fn test_delete_is_not_idempotent() {
        let store = ConversationStore::new();
        assert!(!store.delete("missing"));

        let id = store.create();
        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn test_list_summaries() {
        let store = ConversationStore::new();
        let a = store.create();
        let b = store.create();
        store.append(&a, Role::User, "one", None).unwrap();
        store.append(&a, Role::Assistant, "two", None).unwrap();

        let mut summaries = store.list();
        summaries.sort_by(|x, y| x.id.cmp(&y.id));
        assert_eq!(summaries.len(), 2);
        let for_a = summaries.iter().find(|s| s.id == a).unwrap();
        let for_b = summaries.iter().find(|s| s.id == b).unwrap();
        assert_eq!(for_a.message_count, 2);
        assert_eq!(for_b.message_count, 0);
    }

    #[test]
    fn test_identifiers_are_unique() {
        let store = ConversationStore::new();
        let a = store.create();
        let b = store.create();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_turn_lock_is_per_conversation() {
        let store = ConversationStore::new();
        let a = store.create();
        let b = store.create();

        let lock_a = store.turn_lock(&a);
        let _held = lock_a.lock().await;

        // A held lock on one conversation must not block another.
        let lock_b = store.turn_lock(&b);
        assert!(lock_b.try_lock().is_ok());

        // And the same conversation's lock is shared between lookups.
        assert!(store.turn_lock(&a).try_lock().is_err());
    }
}
