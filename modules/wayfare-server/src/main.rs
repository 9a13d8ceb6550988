use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wayfare_core::AppConfig;
use wayfare_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wayfare=info")),
        )
        .init();

    let config = AppConfig::from_env();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    info!("Connected to database");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    info!("Migrations complete");

    let addr = format!("{}:{}", config.web_host, config.web_port);
    let state = AppState::new(pool, config);
    let app = build_router(state);

    info!("Wayfare API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
