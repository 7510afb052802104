//! Relay server composition.
//!
//! Wires the provider client, session store, and router together and serves
//! them over HTTP with graceful shutdown.

pub mod handlers;
pub mod pages;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::provider::QuickBooksClient;
use crate::session::{MemorySessionStore, SessionStore};

/// The invoice relay server.
pub struct RelayServer {
    config: Config,
    provider: QuickBooksClient,
    sessions: Arc<dyn SessionStore>,
}

impl RelayServer {
    /// Create a server with an in-memory session store.
    ///
    /// # Errors
    ///
    /// Returns error if the provider client cannot be constructed.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let provider = QuickBooksClient::new(&config)?;
        Ok(Self { config, provider, sessions: Arc::new(MemorySessionStore::new()) })
    }

    /// Replace the session store (alternative backends, tests).
    #[must_use]
    pub fn with_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Build the router for this server's state.
    #[must_use]
    pub fn router(&self) -> axum::Router {
        routes::create_router(
            self.provider.clone(),
            Arc::clone(&self.sessions),
            &self.config.session_secret,
        )
    }

    /// Serve HTTP until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let router = self.router();

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for RelayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayServer").field("provider", &self.provider).finish()
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
