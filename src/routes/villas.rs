//! Villa routes: public browse/detail plus admin CRUD.

use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::browse::ListingQuery;
use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::models::pagination::{PagedResult, PageToken, Pagination};
use crate::models::villa::{Villa, VillaInput, VillaOption, VillaSummary};
use crate::services::villa as villa_service;
use crate::AppState;

/// Numbered pager buttons shown on each side of the current page.
const PAGER_SIBLINGS: i64 = 1;

/// One page of browse results plus everything the grid needs to render its
/// pager and keep the address bar in sync.
#[derive(Debug, Serialize)]
pub struct BrowsePage {
    #[serde(flatten)]
    pub result: PagedResult<VillaSummary>,
    /// Page-control tokens: numbers and `"dots"` ellipsis markers.
    pub pager: Vec<PageToken>,
    /// Canonical query string for this view; defaults are omitted so the
    /// URL stays minimal and shareable.
    pub canonical_query: String,
}

/// GET /api/v1/villas — public browse with URL-state semantics.
///
/// The raw query string is parsed leniently: unknown or malformed values
/// fall back to defaults so bookmarked links degrade instead of erroring.
pub async fn browse(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ApiResponse<BrowsePage>>, AppError> {
    let query = ListingQuery::from_query_str(raw.as_deref().unwrap_or(""));
    let result = villa_service::list_public(&state.db, &query.to_request()).await?;

    let pagination = Pagination {
        page: Some(query.page),
        per_page: Some(query.limit()),
    };
    let result = PagedResult::new(result.rows, result.total_count, &pagination);
    let pager = result.page_tokens(PAGER_SIBLINGS);

    Ok(ApiResponse::success(BrowsePage {
        result,
        pager,
        canonical_query: query.to_query_string(),
    }))
}

/// GET /api/v1/villas/featured — landing-page highlight strip.
pub async fn featured(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VillaSummary>>>, AppError> {
    let villas = villa_service::featured(&state.db).await?;
    Ok(ApiResponse::success(villas))
}

/// GET /api/v1/villas/options — dropdown options for the lead form.
pub async fn options(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VillaOption>>>, AppError> {
    let options = villa_service::options(&state.db).await?;
    Ok(ApiResponse::success(options))
}

/// GET /api/v1/villas/slug/{slug} — public detail page payload.
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<Villa>>, AppError> {
    let villa = villa_service::find_by_slug(&state.db, &slug).await?;
    Ok(ApiResponse::success(villa))
}

/// GET /api/v1/villas/{id} — admin detail (staff).
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Villa>>, AppError> {
    let villa = villa_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(villa))
}

/// POST /api/v1/villas — create a listing (admin).
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<VillaInput>,
) -> Result<Json<ApiResponse<Villa>>, AppError> {
    body.validate()?;
    let villa = villa_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(villa))
}

/// PUT /api/v1/villas/{id} — replace a listing (admin).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(body): Json<VillaInput>,
) -> Result<Json<ApiResponse<Villa>>, AppError> {
    body.validate()?;
    let villa = villa_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(villa))
}

/// DELETE /api/v1/villas/{id} — remove a listing (admin).
pub async fn delete_villa(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    villa_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success("Villa deleted"))
}
