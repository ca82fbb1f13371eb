use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vidnest_common::media::fs::FsMediaStore;

use vidnest_server::config::AppConfig;
use vidnest_server::database::init_db;
use vidnest_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    let media = FsMediaStore::open(&config.storage.data_dir, config.storage.max_blob_size)
        .await
        .with_context(|| {
            format!(
                "Failed to open media store at {}",
                config.storage.data_dir.display()
            )
        })?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host/server.port")?;

    let state = AppState {
        db,
        config: Arc::new(config),
        media: Arc::new(media),
    };
    let app = vidnest_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
