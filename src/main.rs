//! cooked-board server entry point.
//!
//! Opens the database and upload directory, then starts the Axum HTTP
//! server.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cooked_board::app_state::AppState;
use cooked_board::config::{BoardConfig, LogFormat};
use cooked_board::persistence::{SqliteStore, UploadStore};
use cooked_board::server::{build_app, shutdown_signal};
use cooked_board::service::BoardService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = BoardConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Plain => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting cooked-board");

    // Build persistence layer
    let store = SqliteStore::connect(&config)
        .await
        .with_context(|| format!("opening database {}", config.database_url))?;
    let uploads = UploadStore::open(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload directory {}", config.upload_dir.display()))?;

    // Build service layer and router
    let app_state = AppState::new(BoardService::new(store, uploads));
    let app = build_app(app_state.clone(), &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    app_state.board.close().await;

    Ok(())
}
