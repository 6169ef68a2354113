use axum::{routing::get, Router};

use crate::{state::AppState, websocket};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws/chat", get(websocket::client_chat))
        .route("/ws/chat/{chat_name}", get(websocket::admin_chat))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
