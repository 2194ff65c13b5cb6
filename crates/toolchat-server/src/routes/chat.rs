use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::ErrorResponse;
use crate::state::AppState;

// Types matching the incoming JSON structure
#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
    conversation_id: Option<String>,
    #[serde(default = "default_use_tools")]
    use_tools: bool,
}

fn default_use_tools() -> bool {
    true
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools_used: Option<Vec<String>>,
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    if request.message.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: "message must not be empty".to_string(),
            }),
        ));
    }

    let reply = state
        .orchestrator
        .chat(
            &request.message,
            request.conversation_id.as_deref(),
            request.use_tools,
        )
        .await
        .map_err(|e| {
            error!(error = %e, "chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
        })?;

    Ok(Json(ChatResponse {
        response: reply.response,
        conversation_id: reply.conversation_id,
        tools_used: reply.tools_used,
    }))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .with_state(state)
}
