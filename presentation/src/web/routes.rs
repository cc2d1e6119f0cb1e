//! HTTP routes and handlers.

use super::error::ApiError;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use datachat_application::{AskOnceUseCase, NoReplyObserver};
use datachat_domain::util::preview;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Chat endpoint path.
pub const CHAT_PATH: &str = "/chat";
/// Health endpoint path.
pub const HEALTH_PATH: &str = "/health";

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub ask: AskOnceUseCase,
}

impl AppState {
    pub fn new(ask: AskOnceUseCase) -> Self {
        Self { ask }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Build the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route(CHAT_PATH, post(chat))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;

    info!("POST {}: {}", CHAT_PATH, preview(&request.message, 100));
    let response = state
        .ask
        .execute(&request.message, &NoReplyObserver)
        .await
        .inspect_err(|e| warn!("Chat request failed: {}", e))?;

    Ok(Json(ChatResponse { response }))
}
