//! Atlas MCP Server Library
//!
//! This crate exposes MongoDB Atlas Data API operations as Model Context
//! Protocol (MCP) tools, so an agent can query and modify documents through
//! plain tool calls.
//!
//! ## Architecture
//!
//! ```text
//! Agent (Claude, GPT, etc.)
//!        │  tools/call {name, arguments}
//!        ▼
//! ┌─────────────────────┐
//! │     MCP Server      │ ◄── This crate
//! │                     │
//! │  ┌───────────────┐  │  mongodb_find_one     mongodb_find
//! │  │     Tools     │  │  mongodb_insert_one   mongodb_insert_many
//! │  │               │  │  mongodb_update_one   mongodb_update_many
//! │  │               │  │  mongodb_delete_one   mongodb_delete_many
//! │  │               │  │  mongodb_aggregate    mongodb_count
//! │  │               │  │  mongodb_distinct     mongodb_group_by
//! │  └───────────────┘  │  mongodb_test_connection
//! └──────────┬──────────┘
//!            │  one client per request
//!            ▼
//! ┌─────────────────────┐
//! │     atlas-data      │  POST {base}/action/{action}
//! └─────────────────────┘
//! ```
//!
//! Nested arguments (filters, updates, documents, pipelines) travel as
//! JSON-encoded strings and are decoded at the tool boundary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atlas_data::TenantCredentials;
//! use atlas_mcp::{Limits, McpServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = McpServer::new(Limits::from_env());
//!     let credentials = TenantCredentials::from_env();
//!     server.run_stdio(&credentials).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod tools;
pub mod truncate;

pub use config::Limits;
pub use error::{ErrorDetails, McpError, McpResult};
pub use server::{McpRequest, McpResponse, McpServer};
pub use tools::{ToolCall, ToolContent, ToolDefinition, ToolResult};

/// Server metadata for MCP protocol
pub const SERVER_NAME: &str = "mongodb-atlas-data-api";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVER_INSTRUCTIONS: &str = "MongoDB Atlas Data API tools. Filters, updates, documents \
and pipelines are passed as JSON-encoded strings, e.g. filter: \"{\\\"status\\\": \\\"active\\\"}\". \
Call mongodb_test_connection first to verify credentials.";
