use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cinescope_api::api::{create_router, AppState};
use cinescope_api::auth::HttpIdentityProvider;
use cinescope_api::config::Config;
use cinescope_api::db::{create_pool, PgWatchlistStore};
use cinescope_api::services::providers::TmdbProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config).await?;
    sqlx::migrate!().run(&pool).await?;

    let state = AppState::new(
        Arc::new(PgWatchlistStore::new(pool)),
        Arc::new(HttpIdentityProvider::new(config.identity_api_url.clone())),
        Arc::new(TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        )),
    );

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
