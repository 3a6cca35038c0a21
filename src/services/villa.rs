//! Villa listing service: the public browse query and admin CRUD.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::browse::{ListingRequest, ListingStore, QueryResult, StatusFilter};
use crate::errors::AppError;
use crate::models::villa::{slugify, Villa, VillaInput, VillaOption, VillaSummary};

const SUMMARY_COLUMNS: &str = "id, slug, nama_listing, alamat_lengkap, harga, harga_promo, \
     roi_perkiraan, status, tipe_villa, foto_urls, memiliki_private_pool, created_at";

/// Execute one filtered, sorted, paginated read over `villa_listings`.
///
/// Substring matching runs against the listing name and the address; status
/// filtering is plain equality; ordering comes from the request's sort key.
pub async fn list_public(
    pool: &PgPool,
    request: &ListingRequest,
) -> Result<QueryResult, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if !request.search_term.is_empty() {
        param_index += 1;
        conditions.push(format!(
            "(nama_listing ILIKE ${param_index} OR alamat_lengkap ILIKE ${param_index})"
        ));
    }
    if matches!(request.status, StatusFilter::Only(_)) {
        param_index += 1;
        conditions.push(format!("status = ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM villa_listings {where_clause}");
    let data_sql = format!(
        "SELECT {SUMMARY_COLUMNS} FROM villa_listings {where_clause} \
         ORDER BY {} LIMIT {} OFFSET {}",
        request.sort.order_clause(),
        request.limit,
        request.offset.max(0)
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, VillaSummary>(&data_sql);

    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if !request.search_term.is_empty() {
        let pattern = format!("%{}%", request.search_term);
        bind_both!(pattern.clone());
    }
    if let StatusFilter::Only(status) = request.status {
        bind_both!(status);
    }

    let total_count = count_query.fetch_one(pool).await?;
    let rows = data_query.fetch_all(pool).await?;

    Ok(QueryResult { rows, total_count })
}

/// PostgreSQL-backed implementation of the browse controller's store seam.
#[derive(Debug, Clone)]
pub struct PgListingStore {
    pool: PgPool,
}

impl PgListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn fetch(&self, request: ListingRequest) -> Result<QueryResult, AppError> {
        list_public(&self.pool, &request).await
    }
}

/// Latest purchasable villas for the landing-page highlight strip.
pub async fn featured(pool: &PgPool) -> Result<Vec<VillaSummary>, AppError> {
    let rows = sqlx::query_as::<_, VillaSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM villa_listings \
         WHERE status <> 'Sold Out' ORDER BY created_at DESC LIMIT 3"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Purchasable villas as dropdown options for the lead form.
pub async fn options(pool: &PgPool) -> Result<Vec<VillaOption>, AppError> {
    let rows = sqlx::query_as::<_, VillaOption>(
        "SELECT id, nama_listing FROM villa_listings \
         WHERE status IN ('Tersedia', 'Promo') ORDER BY nama_listing ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Villa, AppError> {
    sqlx::query_as::<_, Villa>("SELECT * FROM villa_listings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Villa not found".to_string()))
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Villa, AppError> {
    sqlx::query_as::<_, Villa>("SELECT * FROM villa_listings WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Villa not found".to_string()))
}

/// Create a listing. The slug is derived from the listing name; a clash with
/// an existing listing surfaces as a conflict.
pub async fn create(pool: &PgPool, input: &VillaInput) -> Result<Villa, AppError> {
    let slug = slugify(&input.nama_listing);

    let villa = sqlx::query_as::<_, Villa>(
        r#"
        INSERT INTO villa_listings (
            slug, nama_listing, deskripsi_singkat, deskripsi_panjang,
            harga, harga_promo, perkiraan_passive_income, memiliki_private_pool,
            roi_perkiraan, alamat_lengkap, tipe_villa, fasilitas, foto_urls,
            video_tour_url, kontak_marketing, status, jaminan_bep, free_stay,
            lokasi_maps_iframe_url
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        RETURNING *
        "#,
    )
    .bind(&slug)
    .bind(&input.nama_listing)
    .bind(&input.deskripsi_singkat)
    .bind(&input.deskripsi_panjang)
    .bind(input.harga)
    .bind(input.harga_promo)
    .bind(input.perkiraan_passive_income)
    .bind(input.memiliki_private_pool)
    .bind(input.roi_perkiraan)
    .bind(&input.alamat_lengkap)
    .bind(input.tipe_villa)
    .bind(serde_json::to_value(&input.fasilitas).unwrap_or_default())
    .bind(serde_json::to_value(&input.foto_urls).unwrap_or_default())
    .bind(&input.video_tour_url)
    .bind(&input.kontak_marketing)
    .bind(input.status)
    .bind(&input.jaminan_bep)
    .bind(&input.free_stay)
    .bind(&input.lokasi_maps_iframe_url)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("A listing with slug '{slug}' already exists"))
        }
        _ => AppError::Database(e),
    })?;

    Ok(villa)
}

/// Replace a listing's fields; the slug is re-derived from the new name.
pub async fn update(pool: &PgPool, id: Uuid, input: &VillaInput) -> Result<Villa, AppError> {
    let existing = find_by_id(pool, id).await?;
    let slug = slugify(&input.nama_listing);

    let villa = sqlx::query_as::<_, Villa>(
        r#"
        UPDATE villa_listings SET
            slug = $2,
            nama_listing = $3,
            deskripsi_singkat = $4,
            deskripsi_panjang = $5,
            harga = $6,
            harga_promo = $7,
            perkiraan_passive_income = $8,
            memiliki_private_pool = $9,
            roi_perkiraan = $10,
            alamat_lengkap = $11,
            tipe_villa = $12,
            fasilitas = $13,
            foto_urls = $14,
            video_tour_url = $15,
            kontak_marketing = $16,
            status = $17,
            jaminan_bep = $18,
            free_stay = $19,
            lokasi_maps_iframe_url = $20,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(&slug)
    .bind(&input.nama_listing)
    .bind(&input.deskripsi_singkat)
    .bind(&input.deskripsi_panjang)
    .bind(input.harga)
    .bind(input.harga_promo)
    .bind(input.perkiraan_passive_income)
    .bind(input.memiliki_private_pool)
    .bind(input.roi_perkiraan)
    .bind(&input.alamat_lengkap)
    .bind(input.tipe_villa)
    .bind(serde_json::to_value(&input.fasilitas).unwrap_or_default())
    .bind(serde_json::to_value(&input.foto_urls).unwrap_or_default())
    .bind(&input.video_tour_url)
    .bind(&input.kontak_marketing)
    .bind(input.status)
    .bind(&input.jaminan_bep)
    .bind(&input.free_stay)
    .bind(&input.lokasi_maps_iframe_url)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("A listing with slug '{slug}' already exists"))
        }
        _ => AppError::Database(e),
    })?;

    Ok(villa)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM villa_listings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Villa not found".to_string()));
    }
    Ok(())
}
