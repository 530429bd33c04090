pub mod chat;
pub mod config;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::llm::{GeminiClient, LlmClient, LlmError};
use crate::routes::create_routes;
use crate::state::AppState;
use crate::store::{EventStore, PgEventStore, StoreError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();
}

/// Connects the store, serves until a shutdown signal arrives, then closes
/// the store.
pub async fn serve(config: Config) -> Result<(), ServerError> {
    let store = Arc::new(PgEventStore::connect(&config).await?);
    store.migrate().await?;

    let llm: Option<Arc<dyn LlmClient>> = match GeminiClient::from_config(&config)? {
        Some(client) => {
            info!(model = client.model(), "Gemini API key loaded and configured.");
            Some(Arc::new(client) as Arc<dyn LlmClient>)
        }
        None => {
            warn!("GEMINI_API_KEY environment variable not found. Chat functionality will be disabled.");
            None
        }
    };

    let state = AppState::new(store.clone(), llm);
    let app = create_routes(state, &config);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("🚀 Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, releasing event store");
    store.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
