//! Atlas MCP Server Binary
//!
//! MongoDB Atlas Data API tools for AI agents over stdio.
//!
//! ## Usage
//!
//! ```bash
//! MONGODB_API_KEY=... MONGODB_APP_ID=data-abcde MONGODB_DATA_SOURCE=Cluster0 \
//!     atlas-mcp-server
//!
//! # Against a regional or self-hosted endpoint
//! MONGODB_BASE_URL=https://eu-west-1.aws.data.mongodb-api.com/app/data-abcde/endpoint/data/v1 \
//!     atlas-mcp-server
//! ```

use atlas_data::TenantCredentials;
use atlas_mcp::{Limits, McpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stderr keeps stdout clean for the protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atlas_mcp=info,atlas_data=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Atlas MCP Server v{}", env!("CARGO_PKG_VERSION"));

    let limits = Limits::from_env();
    tracing::info!(
        character_limit = limits.character_limit,
        default_page_size = limits.default_page_size,
        max_page_size = limits.max_page_size,
        "limits loaded"
    );

    let credentials = TenantCredentials::from_env();
    if let Err(e) = credentials.validate() {
        tracing::warn!("{}; tool calls will fail until it is set", e);
    }

    let server = McpServer::new(limits);

    tracing::info!("MCP server ready, listening on stdio");
    server.run_stdio(&credentials).await?;

    Ok(())
}
