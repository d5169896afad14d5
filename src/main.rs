use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use newswire_api::api::{create_router, AppState};
use newswire_api::config::Config;
use newswire_api::db::{create_redis_client, Cache};
use newswire_api::services::providers::NewsApiProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client.clone()).await;

    let provider = Arc::new(NewsApiProvider::new(
        cache,
        redis_client,
        config.news_api_key.clone(),
        config.news_api_url.clone(),
    ));

    let state = AppState::new(provider, config.recommendation_limit);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "News aggregation API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush pending cache writes before exiting
    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
