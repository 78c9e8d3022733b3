use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::AtelierError;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await
}

/// Connect with exponential backoff, making at most `connect_attempts` tries.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let retries = config.connect_attempts.saturating_sub(1);
    let retry_strategy = ExponentialBackoff::from_millis(200)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(retries);

    Retry::spawn(retry_strategy, || connect_once(config)).await
}

async fn connect_once(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    create_pool(config).await.map_err(|e| {
        tracing::warn!("Database connection attempt failed: {}", e);
        e
    })
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AtelierError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn health_check(pool: &PgPool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(row.0)
}
