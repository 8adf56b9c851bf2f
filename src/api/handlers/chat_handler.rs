use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::chat_dto::*},
    error::AppError,
};

/// 发送消息给会话 Agent
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    debug!(session_id = %request.session_id, "chat request");

    let response = state
        .chat_service
        .chat(&request.session_id, &request.message)
        .await?;

    Ok(Json(ChatResponse { response }))
}
