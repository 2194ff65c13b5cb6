use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ChatError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Model request failed: {0}")]
    ModelError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ChatResult<T> = Result<T, ChatError>;
