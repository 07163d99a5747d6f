//! HTTP server lifecycle

use std::net::SocketAddr;

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::{AppError, AppResult};

pub struct Server {
    state: ServerState,
}

impl Server {
    pub async fn new(config: Config) -> AppResult<Self> {
        let state = ServerState::initialize(config).await?;
        Ok(Self { state })
    }

    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Bind and serve until ctrl-c
    pub async fn run(self) -> AppResult<()> {
        let port = self.state.config().http_port;
        let app = api::build_app(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, "HTTP server listening");

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
