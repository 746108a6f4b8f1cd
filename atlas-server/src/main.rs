//! Atlas Server Binary
//!
//! HTTP transport for the Atlas MCP tools.
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults (0.0.0.0:3000, CORS on)
//! atlas-server
//!
//! # Custom port, no CORS
//! PORT=8080 atlas-server --no-cors
//! ```
//!
//! Clients send `x-mongodb-api-key`, `x-mongodb-app-id` and
//! `x-mongodb-data-source` (and optionally `x-mongodb-base-url`) with every
//! `tools/call`.

use std::net::IpAddr;

use atlas_mcp::Limits;
use atlas_server::{AtlasServer, ServerConfig, DEFAULT_PORT};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "atlas-server")]
#[command(about = "MongoDB Atlas Data API tools over MCP JSON-RPC/HTTP", long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Disable permissive CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "atlas_server=info,atlas_mcp=info,atlas_data=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::builder()
        .host(args.host)
        .port(args.port)
        .cors(!args.no_cors)
        .build();

    tracing::info!("Starting Atlas Server v{}", env!("CARGO_PKG_VERSION"));

    let server = AtlasServer::new(Limits::from_env(), config);
    server.run().await?;

    Ok(())
}
