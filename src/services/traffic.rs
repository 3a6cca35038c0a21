//! Page-view tracking for the public villa detail pages.

use sqlx::PgPool;

use crate::errors::AppError;

/// Record one page view for a villa detail page. The villa is resolved by
/// slug; a stale or unknown slug still records the view with no villa link,
/// so tracking never breaks the visitor's page load.
pub async fn record_view(pool: &PgPool, slug: &str) -> Result<(), AppError> {
    let villa_id = sqlx::query_scalar::<_, uuid::Uuid>(
        "SELECT id FROM villa_listings WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    sqlx::query("INSERT INTO page_views (villa_id, slug) VALUES ($1, $2)")
        .bind(villa_id)
        .bind(slug)
        .execute(pool)
        .await?;

    Ok(())
}
