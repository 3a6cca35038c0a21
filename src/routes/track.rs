//! Page-view tracking route for the public detail pages.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::services::traffic;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TrackViewRequest {
    pub slug: String,
}

/// POST /api/v1/track/view — record a villa detail page view.
pub async fn record_view(
    State(state): State<AppState>,
    Json(body): Json<TrackViewRequest>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    traffic::record_view(&state.db, &body.slug).await?;
    Ok(ApiResponse::success("recorded"))
}
