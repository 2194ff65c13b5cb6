// Export route modules
pub mod chat;
pub mod conversation;
pub mod health;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(chat::routes(state.clone()))
        .merge(conversation::routes(state))
}
