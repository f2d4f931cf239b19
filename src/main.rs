use actix_web::web;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod db;
mod domain;
mod http;
mod metrics;
mod repository;

use config::AppConfig;
use http::AppState;
use repository::PostgresOrderRepository;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_service=debug"))
        )
        .init();

    tracing::info!("🚀 Starting order service");

    // === 1. Load configuration (missing values abort startup) ===
    let config = AppConfig::from_env()?;

    // === 2. Connect to Postgres and ensure the schema exists ===
    let pool = db::connect(&config.database).await?;
    db::migrate(&pool).await?;

    // === 3. Initialize Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 4. Wire repository into handler state ===
    let repository = Arc::new(PostgresOrderRepository::new(pool.clone()));
    let state = web::Data::new(
        AppState::new(repository, metrics, config.server.request_timeout)
            .with_body_limit(config.server.max_body_bytes),
    );

    // === 5. Serve until shutdown signal ===
    http::run_server(state, &config.server.host, config.server.port).await?;

    tracing::info!("Shutting down, closing database pool");
    pool.close().await;

    tracing::info!("👋 Order service stopped");
    Ok(())
}
