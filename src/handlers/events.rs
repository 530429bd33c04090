use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::models::Event;
use crate::state::AppState;
use crate::utils::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    info!("Request received for /api/events");

    let events = state.store.fetch_all().await?;

    info!("Returning {} events.", events.len());
    Ok(Json(events))
}

pub async fn search_events(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Event>>, AppError> {
    let keyword = params
        .keyword
        .ok_or_else(|| AppError::ValidationError("'keyword' query parameter is required".to_string()))?;

    info!(keyword = %keyword, "Request received for /api/search");

    let events = state.store.search(&keyword).await?;

    info!("Found {} events matching '{}'.", events.len(), keyword);
    Ok(Json(events))
}
