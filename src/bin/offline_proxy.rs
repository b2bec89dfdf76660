use daily_tasks::offline::proxy::{proxy_router, ProxyState};
use daily_tasks::offline::{CacheStorage, HttpFetcher, ServiceWorker, WorkerHost};
use daily_tasks::ProxyConfig;
use reqwest::Url;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = ProxyConfig::from_env();
    let upstream = Url::parse(&config.upstream_origin)?;
    let fetcher = Arc::new(HttpFetcher::new()?);

    let worker = ServiceWorker::new(
        upstream.clone(),
        CacheStorage::default(),
        Arc::clone(&fetcher),
    );
    let host = Arc::new(WorkerHost::new(worker));
    if let Err(err) = host.start().await {
        warn!("offline cache setup failed: {err}");
    }

    let app = proxy_router(ProxyState::new(host, fetcher, upstream.clone()));

    info!("proxying {upstream} on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
