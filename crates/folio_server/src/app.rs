//! Router and server lifecycle

use crate::config::FolioConfig;
use crate::contact::handle_contact;
use crate::static_files::serve_static;
use crate::thoughts::handle_thoughts;
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FolioConfig>,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: FolioConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/contact", post(handle_contact))
        .route("/api/thoughts", get(handle_thoughts))
        .fallback(serve_static)
        .with_state(state)
}

/// Serve on an already bound listener until ctrl-c
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    tracing::info!(
        "Serving {} on http://{}",
        state.config.server.static_dir.display(),
        addr
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

pub async fn serve(config: FolioConfig) -> Result<()> {
    let addr = config.bind_address();
    if !config.server.static_dir.is_dir() {
        tracing::warn!(
            "Static directory {} does not exist",
            config.server.static_dir.display()
        );
    }

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    serve_on(listener, AppState::new(config)).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
