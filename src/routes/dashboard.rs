//! Dashboard routes: aggregated statistics and analytics for the admin console.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireStaff;
use crate::services::dashboard::{self, AnalyticsData, DashboardStats};
use crate::AppState;

/// GET /api/v1/dashboard/stats — aggregated dashboard statistics.
pub async fn stats(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = dashboard::get_stats(&state.db).await?;
    Ok(ApiResponse::success(stats))
}

/// GET /api/v1/dashboard/analytics — traffic and lead aggregates.
pub async fn analytics(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
) -> Result<Json<ApiResponse<AnalyticsData>>, AppError> {
    let analytics = dashboard::get_analytics(&state.db).await?;
    Ok(ApiResponse::success(analytics))
}
