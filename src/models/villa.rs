//! Villa listing model with enums shared across public and admin surfaces.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// -- Enums matching PostgreSQL --

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "villa_status")]
pub enum VillaStatus {
    Tersedia,
    Promo,
    #[sqlx(rename = "Sold Out")]
    #[serde(rename = "Sold Out")]
    SoldOut,
}

impl VillaStatus {
    /// Wire value as it appears in URLs and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tersedia => "Tersedia",
            Self::Promo => "Promo",
            Self::SoldOut => "Sold Out",
        }
    }

    /// Parse a wire value; `None` for anything unknown.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Tersedia" => Some(Self::Tersedia),
            "Promo" => Some(Self::Promo),
            "Sold Out" => Some(Self::SoldOut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "villa_type")]
pub enum VillaType {
    #[sqlx(rename = "1BR")]
    #[serde(rename = "1BR")]
    OneBedroom,
    #[sqlx(rename = "2BR")]
    #[serde(rename = "2BR")]
    TwoBedroom,
    #[sqlx(rename = "3BR")]
    #[serde(rename = "3BR")]
    ThreeBedroom,
    Investasi,
}

// -- Core Villa --

/// Full villa row as stored in `villa_listings`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Villa {
    pub id: Uuid,
    pub slug: String,
    pub nama_listing: String,
    pub deskripsi_singkat: String,
    pub deskripsi_panjang: Option<String>,
    pub harga: i64,
    pub harga_promo: Option<i64>,
    pub perkiraan_passive_income: Option<i64>,
    pub memiliki_private_pool: bool,
    pub roi_perkiraan: Option<f32>,
    pub alamat_lengkap: String,
    pub tipe_villa: VillaType,
    pub fasilitas: serde_json::Value,
    pub foto_urls: serde_json::Value,
    pub video_tour_url: Option<String>,
    pub kontak_marketing: String,
    pub status: VillaStatus,
    pub jaminan_bep: Option<String>,
    pub free_stay: Option<String>,
    pub lokasi_maps_iframe_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card projection returned by list queries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VillaSummary {
    pub id: Uuid,
    pub slug: String,
    pub nama_listing: String,
    pub alamat_lengkap: String,
    pub harga: i64,
    pub harga_promo: Option<i64>,
    pub roi_perkiraan: Option<f32>,
    pub status: VillaStatus,
    pub tipe_villa: VillaType,
    pub foto_urls: serde_json::Value,
    pub memiliki_private_pool: bool,
    pub created_at: DateTime<Utc>,
}

/// Dropdown option for the lead form (purchasable villas only).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VillaOption {
    pub id: Uuid,
    pub nama_listing: String,
}

/// Create/replace payload for a villa listing. The slug is derived
/// server-side from `nama_listing`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VillaInput {
    #[validate(length(min = 1, message = "nama_listing is required"))]
    pub nama_listing: String,
    #[validate(length(min = 1, message = "deskripsi_singkat is required"))]
    pub deskripsi_singkat: String,
    pub deskripsi_panjang: Option<String>,
    #[validate(range(min = 1, message = "harga must be positive"))]
    pub harga: i64,
    pub harga_promo: Option<i64>,
    pub perkiraan_passive_income: Option<i64>,
    #[serde(default)]
    pub memiliki_private_pool: bool,
    pub roi_perkiraan: Option<f32>,
    #[validate(length(min = 1, message = "alamat_lengkap is required"))]
    pub alamat_lengkap: String,
    pub tipe_villa: VillaType,
    #[serde(default)]
    pub fasilitas: Vec<String>,
    #[serde(default)]
    pub foto_urls: Vec<String>,
    pub video_tour_url: Option<String>,
    #[validate(custom(function = validate_wa_number))]
    pub kontak_marketing: String,
    pub status: VillaStatus,
    pub jaminan_bep: Option<String>,
    pub free_stay: Option<String>,
    pub lokasi_maps_iframe_url: Option<String>,
}

static WA_RE: OnceLock<Regex> = OnceLock::new();

/// Indonesian WhatsApp number: country code 62 followed by 8-12 digits.
pub fn wa_number_regex() -> &'static Regex {
    WA_RE.get_or_init(|| Regex::new(r"^62\d{8,12}$").expect("valid WA regex"))
}

pub fn validate_wa_number(value: &str) -> Result<(), ValidationError> {
    if wa_number_regex().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("wa_number")
            .with_message("nomor WA harus berformat 62xxxxxxxxxx".into()))
    }
}

static SLUG_WS_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_STRIP_RE: OnceLock<Regex> = OnceLock::new();

/// Derive a URL slug from a listing name: lowercase, whitespace runs become
/// a single dash, anything outside `[A-Za-z0-9_-]` is stripped.
pub fn slugify(text: &str) -> String {
    let ws = SLUG_WS_RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    let strip = SLUG_STRIP_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid regex"));
    let lowered = text.to_lowercase();
    let dashed = ws.replace_all(lowered.trim(), "-");
    strip.replace_all(&dashed, "").into_owned()
}

/// Format an IDR price the way the marketing site displays it:
/// `Rp 300 Juta`, `Rp 1,5 Miliar`, or a dot-grouped plain amount.
pub fn format_harga(price: i64) -> String {
    if price <= 0 {
        return "Rp 0".to_string();
    }
    if price >= 1_000_000_000 {
        return format!("Rp {} Miliar", format_scaled(price, 1_000_000_000));
    }
    if price >= 1_000_000 {
        return format!("Rp {} Juta", format_scaled(price, 1_000_000));
    }
    format!("Rp {}", group_thousands(price))
}

/// Scale and render with up to two decimals, id-ID style (comma separator).
fn format_scaled(price: i64, unit: i64) -> String {
    let hundredths = price / (unit / 100);
    let whole = hundredths / 100;
    let frac = hundredths % 100;
    if frac == 0 {
        group_thousands(whole)
    } else if frac % 10 == 0 {
        format!("{},{}", group_thousands(whole), frac / 10)
    } else {
        format!("{},{:02}", group_thousands(whole), frac)
    }
}

/// Group digits with dots: 1234567 -> "1.234.567".
fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
