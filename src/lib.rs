pub mod config;
pub mod downloader;
pub mod logging;
pub mod server;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use config::ServerConfig;
use downloader::{
    CatalogResolver, Dispatcher, DownloadDir, DownloadStore, HttpProber, MediaExtractor,
    YtDlpExtractor,
};
use server::{create_router, AppState};

/// Wire the production collaborators from `config`.
pub fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let store = DownloadDir::new(&config.download_dir);
    store
        .ensure_ready()
        .context("preparing download directory")?;

    let extractor = YtDlpExtractor::new(config.extractor_config());
    if !extractor.is_available() {
        warn!(
            extractor = extractor.name(),
            "yt-dlp not found; catalog requests will fail until it is installed"
        );
    }
    let prober = HttpProber::new(config.probe_timeout, config.proxy.as_deref())
        .context("building direct-link prober")?;

    let catalog = CatalogResolver::new(Arc::new(extractor), Arc::new(store));
    Ok(AppState::new(Dispatcher::new(catalog, Arc::new(prober))))
}

pub async fn run() -> anyhow::Result<()> {
    logging::init();

    let config = ServerConfig::from_env().context("reading configuration")?;
    let state = build_state(&config)?;
    let app = create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!(
        download_dir = %config.download_dir.display(),
        "Server listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
