use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

/// Open the Postgres pool
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        max_connections = config.max_connections,
        "Connecting to Postgres..."
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await
}

/// Create the order tables if they do not exist yet
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            order_id     BIGSERIAL PRIMARY KEY,
            customer_id  UUID        NOT NULL,
            created_at   TIMESTAMPTZ NOT NULL,
            shipped_at   TIMESTAMPTZ,
            delivered_at TIMESTAMPTZ
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS line_items (
            order_id BIGINT  NOT NULL REFERENCES orders (order_id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            sku      TEXT    NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            PRIMARY KEY (order_id, position)
        )",
    )
    .execute(pool)
    .await?;

    tracing::debug!("Order schema is up to date");
    Ok(())
}
