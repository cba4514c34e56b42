//! HTTP channel — a small JSON API over the assistant.
//!
//! The chat endpoint always answers 200 with a reply envelope; workflow
//! failures surface as the fallback apology inside the body, never as an
//! HTTP error status.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::assistant::Assistant;
use crate::error::ChannelError;
use crate::specialists::ResponseMetadata;
use crate::workflow::WorkflowState;

const ANONYMOUS_USER: &str = "web-user";

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub conversation_id: Uuid,
    pub content: String,
    pub specialist_type: String,
    pub metadata: ResponseMetadata,
    pub workflow_state: WorkflowState,
}

#[derive(Serialize)]
struct HistoryMessage {
    role: String,
    content: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
struct HistoryResponse {
    conversation_id: Uuid,
    messages: Vec<HistoryMessage>,
}

pub fn build_router(assistant: Arc<Assistant>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chat/{conversation_id}/history", get(history))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(assistant)
}

/// Bind and serve until the process exits.
pub async fn serve(assistant: Arc<Assistant>, port: u16) -> Result<(), ChannelError> {
    let router = build_router(assistant);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ChannelError::StartupFailed {
            name: "http".to_string(),
            reason: format!("Failed to bind {addr}: {e}"),
        })?;
    tracing::info!(%addr, "HTTP channel listening");
    axum::serve(listener, router)
        .await
        .map_err(|e| ChannelError::StartupFailed {
            name: "http".to_string(),
            reason: e.to_string(),
        })
}

async fn chat(
    State(assistant): State<Arc<Assistant>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let user_id = request.user_id.as_deref().unwrap_or(ANONYMOUS_USER);
    let reply = assistant
        .chat(user_id, request.conversation_id, &request.message)
        .await;

    Json(ChatResponse {
        conversation_id: reply.conversation_id,
        content: reply.content,
        specialist_type: reply.specialist,
        metadata: reply.metadata,
        workflow_state: reply.workflow_state,
    })
}

async fn history(
    State(assistant): State<Arc<Assistant>>,
    Path(conversation_id): Path<Uuid>,
) -> Response {
    match assistant.history(conversation_id).await {
        Ok(messages) => {
            let messages = messages
                .into_iter()
                .map(|m| HistoryMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content,
                    timestamp: m.timestamp,
                })
                .collect();
            Json(HistoryResponse {
                conversation_id,
                messages,
            })
            .into_response()
        }
        Err(e) => {
            tracing::debug!(conversation = %conversation_id, error = %e, "History lookup failed");
            (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "conversation not found"})),
            )
                .into_response()
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
