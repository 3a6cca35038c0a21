//! Lead routes: public submission plus admin triage and export.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireStaff;
use crate::models::lead::{CreateLead, Lead, LeadWithVilla, UpdateLeadStatus};
use crate::models::pagination::{PagedResult, Pagination};
use crate::services::lead::{self as lead_service, LeadFilters};
use crate::AppState;

/// POST /api/v1/leads — public submission from the profit-simulation form.
pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<CreateLead>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    body.validate()?;
    let lead = lead_service::create(&state.db, &body).await?;
    tracing::info!(lead_id = %lead.id, "New lead submitted");
    Ok(ApiResponse::success(lead))
}

/// GET /api/v1/leads — list leads with filters and pagination (staff).
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<LeadFilters>,
) -> Result<Json<ApiResponse<PagedResult<LeadWithVilla>>>, AppError> {
    let result = lead_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// PATCH /api/v1/leads/{id}/status — move a lead through triage (staff).
pub async fn update_status(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLeadStatus>,
) -> Result<Json<ApiResponse<Lead>>, AppError> {
    let lead = lead_service::update_status(&state.db, id, body.status).await?;
    Ok(ApiResponse::success(lead))
}

/// DELETE /api/v1/leads/{id} — drop a lead (staff).
pub async fn delete_lead(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    lead_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Lead deleted"))
}

/// GET /api/v1/leads/export — CSV download of every lead (staff).
pub async fn export(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
) -> Result<Response, AppError> {
    let csv = lead_service::export_csv(&state.db).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
