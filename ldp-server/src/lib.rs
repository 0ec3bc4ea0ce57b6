//! Linked Data Platform HTTP server
//!
//! Serves an in-memory LDP repository from `ldp-core` over HTTP.
//!
//! # Features
//!
//! - Basic, direct and indirect containers, RDF and Non-RDF sources
//! - Turtle, N-Triples and RDF/XML with content negotiation
//! - SPARQL Update PATCH, ETag preconditions, `Prefer` handling
//! - `Digest` / `Want-Digest` fixity
//! - Memento versioning (TimeGates, TimeMaps, mementos)
//! - Web Access Control with HTTP Basic authentication
//!
//! # Example
//!
//! ```ignore
//! use ldp_server::{LdpServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let server = LdpServer::new(config).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{RootContainerType, ServerConfig, UserEntry};
pub use error::{Result, ServerError};
pub use state::AppState;
pub use telemetry::{init_logging, TelemetryConfig};

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// LDP HTTP Server
pub struct LdpServer {
    /// Application state
    state: Arc<AppState>,
    /// Configured router
    router: Router,
}

impl LdpServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Result<Self> {
        let state = Arc::new(AppState::new(config)?);
        let router = routes::build_router(state.clone());

        Ok(Self { state, router })
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Get the router for testing
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until Ctrl-C
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let addr = self.state.config.listen_addr;
        let listener = TcpListener::bind(addr).await?;

        info!(
            addr = %addr,
            base_uri = %self.state.base_uri,
            acl = self.state.config.acl_enabled(),
            auth = self.state.config.auth_enabled(),
            versioning = self.state.config.versioning_enabled(),
            "LDP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Builder for LdpServer with fluent API
pub struct LdpServerBuilder {
    config: ServerConfig,
}

impl LdpServerBuilder {
    /// Create a new builder with default config
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Set the listen address
    pub fn listen_addr(mut self, addr: std::net::SocketAddr) -> Self {
        self.config.listen_addr = addr;
        self
    }

    /// Set the public base URI
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.base_uri = Some(uri.into());
        self
    }

    /// Set the root container's interaction model
    pub fn container_type(mut self, container_type: RootContainerType) -> Self {
        self.config.container_type = container_type;
        self
    }

    /// Disable authentication
    pub fn without_auth(mut self) -> Self {
        self.config.no_auth = true;
        self
    }

    /// Allow PUT replacement without If-Match
    pub fn optional_if_match(mut self) -> Self {
        self.config.optional_if_match_etag = true;
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enabled: bool) -> Self {
        self.config.cors_enabled = enabled;
        self
    }

    /// Build the server
    pub fn build(self) -> Result<LdpServer> {
        LdpServer::new(self.config)
    }
}

impl Default for LdpServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
