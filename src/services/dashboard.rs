//! Dashboard and analytics aggregation queries for the admin console.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::lead::LeadWithVilla;

/// Aggregated statistics for the admin overview page.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub villa_counts: VillaStatusCounts,
    pub total_listing_value: i64,
    pub total_leads: i64,
    pub new_leads: i64,
    pub total_page_views: i64,
    pub recent_leads: Vec<LeadWithVilla>,
}

/// Villa counts grouped by listing status.
#[derive(Debug, Serialize)]
pub struct VillaStatusCounts {
    pub tersedia: i64,
    pub promo: i64,
    pub sold_out: i64,
}

/// Aggregates behind the analytics page charts.
#[derive(Debug, Serialize)]
pub struct AnalyticsData {
    pub daily_traffic: Vec<DailyTraffic>,
    pub popular_villas: Vec<PopularVilla>,
    pub status_distribution: VillaStatusCounts,
}

/// Page views for one day of the trailing week.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DailyTraffic {
    pub day: NaiveDate,
    pub views: i64,
}

/// Villa ranked by the number of leads asking about it.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PopularVilla {
    pub id: Uuid,
    pub nama_listing: String,
    pub lead_count: i64,
}

/// Fetch all dashboard statistics in parallel queries.
pub async fn get_stats(pool: &PgPool) -> Result<DashboardStats, AppError> {
    let (villa_counts, total_listing_value, total_leads, new_leads, total_page_views, recent_leads) =
        tokio::try_join!(
            fetch_villa_counts(pool),
            fetch_total_listing_value(pool),
            fetch_total_leads(pool),
            fetch_new_leads(pool),
            fetch_total_page_views(pool),
            fetch_recent_leads(pool),
        )?;

    Ok(DashboardStats {
        villa_counts,
        total_listing_value,
        total_leads,
        new_leads,
        total_page_views,
        recent_leads,
    })
}

/// Fetch the analytics page aggregates in parallel queries.
pub async fn get_analytics(pool: &PgPool) -> Result<AnalyticsData, AppError> {
    let (daily_traffic, popular_villas, status_distribution) = tokio::try_join!(
        fetch_daily_traffic(pool),
        fetch_popular_villas(pool),
        fetch_villa_counts(pool),
    )?;

    Ok(AnalyticsData {
        daily_traffic,
        popular_villas,
        status_distribution,
    })
}

/// Count villas grouped by status.
async fn fetch_villa_counts(pool: &PgPool) -> Result<VillaStatusCounts, AppError> {
    // Conditional aggregation in a single query.
    let row = sqlx::query_as::<_, StatusRow>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN status = 'Tersedia' THEN 1 ELSE 0 END), 0) AS tersedia,
            COALESCE(SUM(CASE WHEN status = 'Promo'    THEN 1 ELSE 0 END), 0) AS promo,
            COALESCE(SUM(CASE WHEN status = 'Sold Out' THEN 1 ELSE 0 END), 0) AS sold_out
        FROM villa_listings
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(VillaStatusCounts {
        tersedia: row.tersedia,
        promo: row.promo,
        sold_out: row.sold_out,
    })
}

/// Intermediate row for status conditional aggregation.
#[derive(Debug, sqlx::FromRow)]
struct StatusRow {
    tersedia: i64,
    promo: i64,
    sold_out: i64,
}

/// Combined asking price of villas still on the market.
async fn fetch_total_listing_value(pool: &PgPool) -> Result<i64, AppError> {
    let value = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(harga), 0) FROM villa_listings WHERE status <> 'Sold Out'",
    )
    .fetch_one(pool)
    .await?;
    Ok(value)
}

async fn fetch_total_leads(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Count leads awaiting first contact (status = 'Baru').
async fn fetch_new_leads(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leads WHERE status = 'Baru'")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn fetch_total_page_views(pool: &PgPool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM page_views")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Fetch the 5 most recent leads for the dashboard feed.
async fn fetch_recent_leads(pool: &PgPool) -> Result<Vec<LeadWithVilla>, AppError> {
    let rows = sqlx::query_as::<_, LeadWithVilla>(
        r#"
        SELECT l.id, l.nama, l.domisili, l.no_wa, l.status, l.villa_id,
               v.nama_listing AS villa_name, l.created_at
        FROM leads l
        LEFT JOIN villa_listings v ON v.id = l.villa_id
        ORDER BY l.created_at DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Page views per day over the trailing 7 days.
async fn fetch_daily_traffic(pool: &PgPool) -> Result<Vec<DailyTraffic>, AppError> {
    let rows = sqlx::query_as::<_, DailyTraffic>(
        r#"
        SELECT DATE(created_at) AS day, COUNT(*) AS views
        FROM page_views
        WHERE created_at >= NOW() - INTERVAL '7 days'
        GROUP BY DATE(created_at)
        ORDER BY day ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Top 5 villas by lead count.
async fn fetch_popular_villas(pool: &PgPool) -> Result<Vec<PopularVilla>, AppError> {
    let rows = sqlx::query_as::<_, PopularVilla>(
        r#"
        SELECT v.id, v.nama_listing, COUNT(l.id) AS lead_count
        FROM villa_listings v
        INNER JOIN leads l ON l.villa_id = v.id
        GROUP BY v.id, v.nama_listing
        ORDER BY COUNT(l.id) DESC
        LIMIT 5
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
