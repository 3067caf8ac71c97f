//! AI advisor chat endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::db::{ChatHistoryQuery, ChatMessage, ChatRequest, ChatResponse};
use crate::AppState;

use super::error::ApiError;

/// Forward a message to the AI advisor. Upstream failures are reported in
/// the body with `success: false`.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(state.chat.chat(req).await)
}

pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    Ok(Json(state.chat.history(query.user_id).await?))
}
