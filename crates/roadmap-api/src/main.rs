mod cache;
mod config;
mod content;
mod error;
mod search;
mod server;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::ContentCache;
use config::Config;
use content::ContentStore;
use roadmap_common::redis::RedisCache;
use server::ApiState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting roadmap content API");

    let config = Config::from_env()?;
    info!(
        content_dir = %config.content_dir,
        port = config.port,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    let redis = RedisCache::new(config.redis_url.as_deref(), cache::NAMESPACE);
    if redis.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without cache");
    }
    let cache = Arc::new(ContentCache::new(redis));
    let content = Arc::new(ContentStore::new(config.content_dir()));

    let fingerprint = content.fingerprint().await?;
    if cache.get_fingerprint().await.as_deref() != Some(fingerprint.as_str()) {
        info!(fingerprint = %fingerprint, "content changed since last run, resetting cache");
        cache.reset(&fingerprint).await;
    } else {
        info!("cached responses up to date");
    }

    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(listen_addr = %addr, "server is running");
    axum::serve(listener, server::router(ApiState::new(content, cache))).await?;
    info!("server shut down");
    Ok(())
}
