//! Lead service: public submissions, admin triage, and CSV export.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::lead::{CreateLead, Lead, LeadStatus, LeadWithVilla};
use crate::models::pagination::{PagedResult, Pagination};

const LEAD_COLUMNS: &str = "l.id, l.nama, l.domisili, l.no_wa, l.status, l.villa_id, \
     v.nama_listing AS villa_name, l.created_at";

/// Filters for the admin lead list.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LeadFilters {
    pub status: Option<LeadStatus>,
    pub search: Option<String>,
}

/// Record a submission from the profit-simulation form.
pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, AppError> {
    let lead = sqlx::query_as::<_, Lead>(
        r#"
        INSERT INTO leads (nama, domisili, no_wa, villa_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&input.nama)
    .bind(&input.domisili)
    .bind(&input.no_wa)
    .bind(input.villa_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::Validation("Unknown villa_id".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(lead)
}

/// List leads newest-first with the villa each one asked about.
pub async fn list(
    pool: &PgPool,
    filters: &LeadFilters,
    pagination: &Pagination,
) -> Result<PagedResult<LeadWithVilla>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if filters.status.is_some() {
        param_index += 1;
        conditions.push(format!("l.status = ${param_index}"));
    }
    if filters.search.is_some() {
        param_index += 1;
        conditions.push(format!(
            "(l.nama ILIKE ${param_index} OR l.domisili ILIKE ${param_index})"
        ));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM leads l {where_clause}");
    let data_sql = format!(
        "SELECT {LEAD_COLUMNS} FROM leads l \
         LEFT JOIN villa_listings v ON v.id = l.villa_id {where_clause} \
         ORDER BY l.created_at DESC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, LeadWithVilla>(&data_sql);

    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if let Some(status) = filters.status {
        bind_both!(status);
    }
    if let Some(ref search) = filters.search {
        let pattern = format!("%{search}%");
        bind_both!(pattern.clone());
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: LeadStatus,
) -> Result<Lead, AppError> {
    sqlx::query_as::<_, Lead>(
        "UPDATE leads SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM leads WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Lead not found".to_string()));
    }
    Ok(())
}

/// Export every lead as CSV for offline follow-up.
pub async fn export_csv(pool: &PgPool) -> Result<String, AppError> {
    let leads = sqlx::query_as::<_, LeadWithVilla>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads l \
         LEFT JOIN villa_listings v ON v.id = l.villa_id \
         ORDER BY l.created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["nama", "domisili", "no_wa", "status", "villa", "created_at"])
        .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;
    for lead in &leads {
        writer
            .write_record([
                lead.nama.as_str(),
                lead.domisili.as_str(),
                lead.no_wa.as_str(),
                csv_status(lead.status),
                lead.villa_name.as_deref().unwrap_or(""),
                &lead.created_at.to_rfc3339(),
            ])
            .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV write failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding failed: {e}")))
}

fn csv_status(status: LeadStatus) -> &'static str {
    match status {
        LeadStatus::Baru => "Baru",
        LeadStatus::Dihubungi => "Dihubungi",
        LeadStatus::Tertarik => "Tertarik",
        LeadStatus::TidakTertarik => "Tidak Tertarik",
    }
}
