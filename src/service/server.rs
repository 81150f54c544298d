//! HTTP server lifecycle
//!
//! Binds the API router to the configured address and serves it until a
//! shutdown signal is sent.

use crate::api::build_router;
use crate::config::AppConfig;
use crate::service::app::{AppState, ServiceError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

/// Server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            host: config.http.host.clone(),
            port: config.http.port,
        }
    }
}

/// API server with graceful shutdown
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown_tx: watch::Sender<bool>,
}

impl ApiServer {
    /// Create a new server
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            config,
            state,
            shutdown_tx,
        }
    }

    /// Bind and serve until `stop` is called
    pub async fn start(&self) -> Result<(), ServiceError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| ServiceError::Server {
                message: format!("Invalid server address: {}", e),
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServiceError::Server {
                message: format!("Failed to bind {}: {}", addr, e),
            })?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServiceError> {
        let app = build_router(self.state.clone());

        if let Ok(addr) = listener.local_addr() {
            info!("API server listening on http://{}", addr);
        }

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|stopped| *stopped).await;
                info!("API server shutdown signal received");
            })
            .await
            .map_err(|e| ServiceError::Server {
                message: e.to_string(),
            })?;

        info!("API server stopped");
        Ok(())
    }

    /// Signal the server to stop accepting connections.
    ///
    /// The flag is sticky, so a stop issued before `serve` starts still applies.
    pub fn stop(&self) {
        info!("Stopping API server...");
        self.shutdown_tx.send_replace(true);
    }
}
