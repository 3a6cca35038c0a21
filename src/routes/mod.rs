//! Route definitions for the Haspro Villa API.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod leads;
pub mod track;
pub mod uploads;
pub mod villas;

use axum::http::HeaderValue;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Maximum request body size; uploads carry villa photos.
const MAX_BODY_BYTES: usize = 15 * 1024 * 1024;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/users", post(auth::create_user))
        .route("/auth/me", get(auth::me));

    let villa_routes = Router::new()
        .route("/villas", get(villas::browse).post(villas::create))
        .route("/villas/featured", get(villas::featured))
        .route("/villas/options", get(villas::options))
        .route("/villas/slug/{slug}", get(villas::get_by_slug))
        .route(
            "/villas/{id}",
            get(villas::get_by_id)
                .put(villas::update)
                .delete(villas::delete_villa),
        );

    let lead_routes = Router::new()
        .route("/leads", post(leads::submit).get(leads::list))
        .route("/leads/export", get(leads::export))
        .route("/leads/{id}/status", patch(leads::update_status))
        .route("/leads/{id}", delete(leads::delete_lead));

    let admin_routes = Router::new()
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/analytics", get(dashboard::analytics))
        .route("/uploads/villa-images", post(uploads::upload_photos));

    let track_routes = Router::new().route("/track/view", post(track::record_view));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", auth_routes)
        .nest("/api/v1", villa_routes)
        .nest("/api/v1", lead_routes)
        .nest("/api/v1", admin_routes)
        .nest("/api/v1", track_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
