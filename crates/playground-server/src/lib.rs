//! Agent playground HTTP server.
//!
//! Serves the playground's static assets from a single public directory.
//! Every request path is confined to that directory by [`PathResolver`].
//! Endpoints: /health, /health/live, /status, and any other GET path as a
//! static file.

mod content_type;
mod error;
mod handlers;
mod resolver;
mod routes;
mod state;

use std::path::PathBuf;
use std::time::Duration;

use playground_config::PlaygroundConfig;

pub use content_type::content_type_for;
pub use error::ServerError;
pub use resolver::{FileProbe, FsProbe, PathResolver, Probe, Resolution};
pub use routes::build_router;
pub use state::AppState;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Confinement root for static files.
    pub public_dir: PathBuf,
    /// Served for `/`.
    pub default_document: String,
    pub request_timeout: Duration,
    pub concurrency_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_config(&PlaygroundConfig::default())
    }
}

impl ServerConfig {
    pub fn from_config(config: &PlaygroundConfig) -> Self {
        let server = &config.server;
        Self {
            host: server.host.clone(),
            port: server.port,
            public_dir: server.public_dir.clone(),
            default_document: server.default_document.clone(),
            request_timeout: server.request_timeout.as_duration(),
            concurrency_limit: server.concurrency_limit,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the shared state this configuration describes.
    pub fn state(&self) -> Result<AppState, ServerError> {
        let resolver = PathResolver::new(&self.public_dir, self.default_document.clone())?;
        Ok(AppState::with_limits(
            resolver,
            self.request_timeout,
            self.concurrency_limit,
        ))
    }
}

/// Start the playground server with graceful shutdown on SIGTERM/SIGINT.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let state = config.state()?;
    let root = state.resolver().root().to_path_buf();
    let app = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(public_dir = %root.display(), "Agent Playground running at http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Playground server shut down gracefully");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("Received SIGINT, shutting down..."); }
        _ = terminate => { tracing::info!("Received SIGTERM, shutting down..."); }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_document, "index.html");
        assert_eq!(config.addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_state_rejects_missing_public_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = ServerConfig {
            public_dir: tmp.path().join("absent"),
            ..ServerConfig::default()
        };
        assert!(matches!(config.state(), Err(ServerError::InvalidRoot { .. })));
    }

    #[tokio::test]
    async fn test_serve_reports_bind_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = ServerConfig {
            port: taken.local_addr().unwrap().port(),
            public_dir: tmp.path().to_path_buf(),
            ..ServerConfig::default()
        };
        assert!(matches!(serve(config).await, Err(ServerError::Bind { .. })));
    }
}
