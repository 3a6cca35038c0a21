//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` and `JWT_SECRET` environment variables (reads .env).

use sqlx::PgPool;
use uuid::Uuid;

const ADMIN_PASSWORD: &str = "Test123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Haspro Villa Seed Script ===");

    seed_users(&pool).await?;
    let villa_ids = seed_villas(&pool).await?;
    seed_leads(&pool, &villa_ids).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: admin / {ADMIN_PASSWORD}");

    Ok(())
}

async fn seed_users(pool: &PgPool) -> anyhow::Result<()> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = 'admin')")
            .fetch_one(pool)
            .await?;

    let hash = haspro_villa::services::auth::hash_password(ADMIN_PASSWORD)?;

    if exists {
        // Update password for existing admin user
        sqlx::query("UPDATE users SET password_hash = $1 WHERE username = 'admin'")
            .bind(&hash)
            .execute(pool)
            .await?;
        println!("[done] Updated admin password");
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO users (username, email, password_hash, display_name, role)
         VALUES ('admin', 'admin@haspro.local', $1, 'Administrator', 'Admin')",
    )
    .bind(&hash)
    .execute(pool)
    .await?;

    // Also create a marketing user for testing
    let marketing_hash = haspro_villa::services::auth::hash_password("marketing123")?;
    sqlx::query(
        "INSERT INTO users (username, email, password_hash, display_name, role)
         VALUES ('marketing', 'marketing@haspro.local', $1, 'Tim Marketing', 'Marketing')",
    )
    .bind(&marketing_hash)
    .execute(pool)
    .await?;

    println!("[done] Created admin and marketing users");
    Ok(())
}

async fn seed_villas(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM villa_listings")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Villas already seeded ({count} rows)");
        let ids = sqlx::query_scalar("SELECT id FROM villa_listings")
            .fetch_all(pool)
            .await?;
        return Ok(ids);
    }

    let villas: [(&str, i64, Option<f32>, &str, &str, &str); 4] = [
        (
            "Villa Sunrise Ubud",
            1_500_000_000,
            Some(12.5),
            "2BR",
            "Tersedia",
            "Jl. Raya Ubud No. 10, Gianyar",
        ),
        (
            "Villa Canggu Breeze",
            2_250_000_000,
            Some(10.0),
            "3BR",
            "Promo",
            "Jl. Pantai Berawa No. 8, Canggu",
        ),
        (
            "Villa Seminyak Hideaway",
            950_000_000,
            Some(9.0),
            "1BR",
            "Tersedia",
            "Jl. Kayu Aya No. 21, Seminyak",
        ),
        (
            "Villa Investasi Nusa Dua",
            3_100_000_000,
            Some(14.0),
            "Investasi",
            "Sold Out",
            "Kawasan BTDC, Nusa Dua",
        ),
    ];

    let mut ids = Vec::with_capacity(villas.len());
    for (nama, harga, roi, tipe, status, alamat) in villas {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO villa_listings (
                slug, nama_listing, deskripsi_singkat, harga, roi_perkiraan,
                alamat_lengkap, tipe_villa, fasilitas, kontak_marketing, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7::villa_type, $8, $9, $10::villa_status)
            RETURNING id
            "#,
        )
        .bind(haspro_villa::models::villa::slugify(nama))
        .bind(nama)
        .bind(format!("{nama} — hunian premium dengan potensi sewa tinggi."))
        .bind(harga)
        .bind(roi)
        .bind(alamat)
        .bind(tipe)
        .bind(serde_json::json!(["Private Pool", "WiFi", "Parkir"]))
        .bind("6281234567890")
        .bind(status)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("[done] Created {} sample villas", ids.len());
    Ok(ids)
}

async fn seed_leads(pool: &PgPool, villa_ids: &[Uuid]) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("[skip] Leads already seeded ({count} rows)");
        return Ok(());
    }

    let leads = [
        ("Budi Santoso", "Jakarta", "6281111111111"),
        ("Sari Dewi", "Surabaya", "6282222222222"),
        ("Andi Wijaya", "Bandung", "6283333333333"),
    ];

    for (i, (nama, domisili, no_wa)) in leads.iter().enumerate() {
        sqlx::query(
            "INSERT INTO leads (nama, domisili, no_wa, villa_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(nama)
        .bind(domisili)
        .bind(no_wa)
        .bind(villa_ids.get(i % villa_ids.len().max(1)))
        .execute(pool)
        .await?;
    }

    println!("[done] Created {} sample leads", leads.len());
    Ok(())
}
