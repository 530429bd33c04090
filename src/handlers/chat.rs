use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chat::{build_prompt, format_events_for_context};
use crate::state::AppState;
use crate::utils::error::AppError;

const LOG_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Answers a free-form question using every stored event as context.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // Checked before the body so an unconfigured provider always reports 503.
    let llm = state.llm()?;

    let Json(request) = payload.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;
    let query = request
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("'query' field is required.".to_string()))?;

    info!(query = %query, "Received chat query");

    let events = state.store.fetch_all().await?;
    let event_context = format_events_for_context(&events);
    info!("Providing {} events as context to LLM.", events.len());

    let prompt = build_prompt(&event_context, &query);

    info!(model = llm.model(), "Sending request to LLM");
    let response = llm.generate(&prompt).await?;

    let preview: String = response.chars().take(LOG_PREVIEW_CHARS).collect();
    info!(preview = %preview, "Received response from LLM");

    Ok(Json(ChatResponse { response }))
}
