use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::Config;

/// Builds pool options from the application config
///
/// Watchlist traffic is one short statement per user action, so the pool
/// stays small; size and acquire timeout come from the environment rather
/// than constants so deployments can tune them.
fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs))
}

/// Connects the watchlist database pool
pub async fn create_pool(config: &Config) -> anyhow::Result<PgPool> {
    let pool = pool_options(config).connect(&config.database_url).await?;

    tracing::info!(
        max_connections = config.database_max_connections,
        "Connected to Postgres"
    );

    Ok(pool)
}
