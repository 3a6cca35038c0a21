//! Upload routes: villa photo storage (admin, multipart).

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::services::storage::{self, StoredPhoto};
use crate::AppState;

/// POST /api/v1/uploads/villa-images — store one or more photos and return
/// their public URLs for the villa form.
pub async fn upload_photos(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<StoredPhoto>>>, AppError> {
    let mut stored = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(|f| f.to_string())
            .ok_or_else(|| AppError::Validation("Missing file name".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

        let photo = storage::save_photo(
            &state.config.upload_dir,
            &state.config.public_base_url,
            &file_name,
            &data,
        )
        .await?;
        tracing::info!(file = %photo.file_name, "Stored villa photo");
        stored.push(photo);
    }

    if stored.is_empty() {
        return Err(AppError::Validation(
            "Missing 'file' field in multipart request".to_string(),
        ));
    }

    Ok(ApiResponse::success(stored))
}
