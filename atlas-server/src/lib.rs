//! Atlas Server - MCP over HTTP
//!
//! Serves the same JSON-RPC methods as the stdio binary on `POST /mcp`.
//! Each request carries its own Data API credentials in headers, so one
//! process can serve many tenants without holding any of their keys.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    AtlasServer                       │
//! │  ┌─────────────────────────────────────────────┐    │
//! │  │          atlas-mcp::McpServer               │    │
//! │  │         (all tool logic lives here)         │    │
//! │  └─────────────────────────────────────────────┘    │
//! │                        │                             │
//! │             ┌──────────┴──────────┐                  │
//! │             ▼                     ▼                  │
//! │         GET /health          POST /mcp              │
//! └─────────────────────────────────────────────────────┘
//! ```

mod config;
pub mod routes;

pub use config::{ServerConfig, ServerConfigBuilder, DEFAULT_PORT};

use std::net::SocketAddr;
use std::sync::Arc;

use atlas_mcp::{Limits, McpServer};
use axum::Router;

/// Shared application state
pub struct AppState {
    /// Protocol handler (wraps atlas-mcp)
    pub mcp: McpServer,
}

impl AppState {
    pub fn new(limits: Limits) -> Self {
        Self {
            mcp: McpServer::new(limits),
        }
    }
}

/// Atlas HTTP Server
///
/// # Example
///
/// ```rust,ignore
/// use atlas_mcp::Limits;
/// use atlas_server::{AtlasServer, ServerConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let config = ServerConfig::builder().port(3000).build();
///     let server = AtlasServer::new(Limits::from_env(), config);
///     server.run().await.unwrap();
/// }
/// ```
pub struct AtlasServer {
    state: Arc<AppState>,
    config: ServerConfig,
}

impl AtlasServer {
    pub fn new(limits: Limits, config: ServerConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(limits)),
            config,
        }
    }

    /// Build the Axum router with all routes
    pub fn router(&self) -> Router {
        routes::create_router(Arc::clone(&self.state), self.config.cors_enabled)
    }

    /// Get the socket address for the server
    pub fn addr(&self) -> SocketAddr {
        self.config.addr()
    }

    /// Run the server
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let addr = self.addr();

        tracing::info!("Atlas Server listening on http://{}", addr);
        tracing::info!("Endpoints:");
        tracing::info!("  GET  /health");
        tracing::info!("  POST /mcp");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
