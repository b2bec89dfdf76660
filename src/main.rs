use daily_tasks::dates::today_key;
use daily_tasks::{load_document, router, save_document, AppConfig, AppState, Session};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env()?;
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut session = Session::new(load_document(&config.data_path).await);
    if session.ensure_today(&today_key()) {
        save_document(&config.data_path, &session.document)
            .await
            .map_err(|err| err.message)?;
    }
    info!(
        tasks = session.document.tasks.len(),
        path = %config.data_path.display(),
        "loaded document"
    );

    let app = router(AppState::new(config.data_path, session));

    info!("listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
