use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use toolchat::conversation::ConversationSummary;
use toolchat::models::role::Role;

use super::ErrorResponse;
use crate::state::AppState;

/// The transport view of a message: role, content and timestamp only.
#[derive(Debug, Serialize)]
struct MessageView {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

async fn list_conversations(State(state): State<AppState>) -> Json<Vec<ConversationSummary>> {
    Json(state.orchestrator.store().list())
}

async fn conversation_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<MessageView>>, (StatusCode, Json<ErrorResponse>)> {
    let messages = state
        .orchestrator
        .store()
        .messages(&conversation_id)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Conversation not found".to_string(),
                }),
            )
        })?;

    let views = messages
        .into_iter()
        .map(|m| MessageView {
            role: m.role,
            content: m.content,
            timestamp: m.timestamp,
        })
        .collect();
    Ok(Json(views))
}

async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    if state.orchestrator.store().delete(&conversation_id) {
        Ok(Json(json!({"message": "Conversation deleted successfully"})))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Conversation not found".to_string(),
            }),
        ))
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/conversations", get(list_conversations))
        .route(
            "/conversations/:conversation_id/messages",
            get(conversation_messages),
        )
        .route(
            "/conversations/:conversation_id",
            delete(delete_conversation),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, request_json, test_app};
    use axum::http::{Method, StatusCode};
    use toolchat::models::role::Role;

    #[tokio::test]
    async fn test_list_conversations() {
        let (app, state) = test_app(vec![]);
        let store = state.orchestrator.store();
        let id = store.create();
        store.append(&id, Role::User, "hi", None).unwrap();

        let (status, body) = get_json(app, "/conversations").await;

        assert_eq!(status, StatusCode::OK);
        let summaries = body.as_array().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0]["id"], id.as_str());
        assert_eq!(summaries[0]["message_count"], 1);
    }

    #[tokio::test]
    async fn test_conversation_messages() {
        let (app, state) = test_app(vec![]);
        let store = state.orchestrator.store();
        let id = store.create();
        store.append(&id, Role::User, "hi", None).unwrap();

        let (status, body) = get_json(app, &format!("/conversations/{id}/messages")).await;

        assert_eq!(status, StatusCode::OK);
        let messages = body.as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "hi");
        assert!(messages[0]["timestamp"].is_string());
        // Metadata stays internal to the core.
        assert!(messages[0].get("metadata").is_none());
    }

    #[tokio::test]
    async fn test_empty_conversation_is_not_a_404() {
        let (app, state) = test_app(vec![]);
        let id = state.orchestrator.store().create();

        let (status, body) = get_json(app, &format!("/conversations/{id}/messages")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_conversation_messages_404() {
        let (app, _state) = test_app(vec![]);

        let (status, _body) = get_json(app, "/conversations/missing/messages").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_conversation_twice() {
        let (app, state) = test_app(vec![]);
        let id = state.orchestrator.store().create();

        let (status, body) =
            request_json(app.clone(), Method::DELETE, &format!("/conversations/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].as_str().unwrap().contains("deleted"));

        let (status, _body) =
            request_json(app, Method::DELETE, &format!("/conversations/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
