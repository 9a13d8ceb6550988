use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tokio::sync::Mutex;

use wayfare_core::AppConfig;

use crate::jwt::JwtService;
use crate::{admin, rest};

pub struct AppState {
    pub pool: PgPool,
    pub config: AppConfig,
    pub jwt: JwtService,
    pub rate_limiter: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Arc<Self> {
        let jwt = JwtService::new(&config.jwt_secret, "wayfare".to_string());
        Arc::new(Self {
            pool,
            config,
            jwt,
            rate_limiter: Mutex::new(HashMap::new()),
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health/", get(health))
        // REST API
        .route(
            "/api/listings",
            get(rest::listings::list_listings).post(rest::listings::create_listing),
        )
        .route(
            "/api/listings/{id}",
            get(rest::listings::listing_detail)
                .put(rest::listings::update_listing)
                .delete(rest::listings::delete_listing),
        )
        .route(
            "/api/listings/{id}/reviews",
            get(rest::reviews::list_reviews).post(rest::reviews::create_review),
        )
        .route("/api/reviews/{id}", axum::routing::delete(rest::reviews::delete_review))
        // Admin screens (Dioxus SSR)
        .route("/admin/login", get(admin::login_page).post(admin::login_submit))
        .route("/admin/logout", post(admin::logout))
        .route("/admin", get(admin::dashboard))
        .route("/admin/listings", get(admin::listings_page))
        .route(
            "/admin/listings/{id}",
            get(admin::listing_edit_page).post(admin::listing_edit_submit),
        )
        .route("/admin/listings/{id}/active", post(admin::listing_toggle_active))
        .route("/admin/reviews", get(admin::reviews_page))
        .route("/admin/reviews/{id}/delete", post(admin::review_delete))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only (no query params, no IP)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

/// Liveness check. No side effects; safe to poll.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
