use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::sync::Mutex;

use super::base::{Completion, Provider};
use crate::models::message::Message;

/// A mock provider that returns pre-configured completions for testing
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Completion>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of completions
    pub fn new(responses: Vec<Completion>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(
        &self,
        _messages: &[Message],
        _tool_schemas: &[Value],
        _allow_tools: bool,
    ) -> Result<Completion> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return an empty completion if no more pre-configured responses
            Ok(Completion::text(""))
        } else {
            Ok(responses.remove(0))
        }
    }
}
