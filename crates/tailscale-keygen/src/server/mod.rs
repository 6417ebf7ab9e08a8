//! HTTP server for key issuance.
//!
//! Serves `POST /api/get-key` plus liveness routes, with graceful shutdown on
//! Ctrl+C / SIGTERM.

pub mod transport;

use std::net::SocketAddr;

use crate::config::Config;
use crate::issuer::KeyIssuer;

/// Key issuance HTTP server.
#[derive(Debug)]
pub struct KeyServer {
    /// Issuer shared by all requests.
    issuer: KeyIssuer,

    /// Attach `details` to error bodies.
    expose_error_details: bool,
}

impl KeyServer {
    /// Create a new server.
    #[must_use]
    pub const fn new(issuer: KeyIssuer, expose_error_details: bool) -> Self {
        Self { issuer, expose_error_details }
    }

    /// Create a server backed by the real Tailscale API.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let issuer = KeyIssuer::from_config(config)?;
        Ok(Self::new(issuer, config.expose_error_details))
    }

    /// Build the router without binding a socket.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        transport::create_router(self.issuer.clone(), self.expose_error_details)
    }

    /// Run the server until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self, addr: SocketAddr) -> anyhow::Result<()> {
        let missing = self.issuer.credentials().missing();
        if !missing.is_empty() {
            tracing::warn!(
                missing = %missing.join(", "),
                "Credentials incomplete; every key request will fail until they are set"
            );
        }

        let router = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Received shutdown signal");
}
