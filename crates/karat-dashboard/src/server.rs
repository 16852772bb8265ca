//! Dashboard server implementation.

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;
use karat_client::ApiClient;
use karat_core::DashboardConfig;
use tokio::net::TcpListener;

/// The dashboard server.
pub struct DashboardServer {
    config: DashboardConfig,
    client: ApiClient,
}

impl DashboardServer {
    /// Create a new dashboard server with the given configuration.
    pub fn new(config: DashboardConfig, client: ApiClient) -> Self {
        Self { config, client }
    }

    /// Start the dashboard server. Returns on Ctrl-C.
    pub async fn run(&self) -> Result<(), DashboardError> {
        let addr = self.config.bind_addr();
        let app = routes::create_router(AppState::new(self.client.clone()));

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::StartupFailed(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(
            address = %addr,
            api = %self.client.base_url(),
            "Karat console listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        tracing::info!("Karat console stopped");
        Ok(())
    }

    /// Get the configured listen address.
    pub fn bind_addr(&self) -> String {
        self.config.bind_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
