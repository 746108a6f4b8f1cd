//! MCP Server protocol implementation
//!
//! JSON-RPC dispatch shared by the stdio binary and the HTTP transport.
//! Every `tools/call` builds its own Data API client from the credentials
//! handed in with the request.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use atlas_data::{AtlasDataClient, TenantCredentials};

use crate::config::Limits;
use crate::error::McpError;
use crate::tools::{self, ToolCall, ToolResult};
use crate::{SERVER_INSTRUCTIONS, SERVER_NAME, SERVER_VERSION};

/// MCP protocol revision spoken by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 error codes
pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// MCP JSON-RPC request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl McpRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Notifications never get a response
    pub fn is_notification(&self) -> bool {
        self.method.starts_with("notifications/")
    }
}

/// MCP JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// `-32700` response for a body that is not a JSON-RPC request
    pub fn parse_error(err: &serde_json::Error) -> Self {
        Self::error(None, PARSE_ERROR, format!("Parse error: {}", err))
    }
}

/// Atlas MCP server
///
/// Holds nothing but the read-only limits; credentials arrive per request.
#[derive(Debug, Clone, Default)]
pub struct McpServer {
    limits: Limits,
}

impl McpServer {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Handle an MCP request; `None` for notifications
    pub async fn handle_request(
        &self,
        request: McpRequest,
        credentials: &TenantCredentials,
    ) -> Option<McpResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification");
            return None;
        }

        let id = request.id;
        let response = match request.method.as_str() {
            "initialize" => McpResponse::success(id, self.handle_initialize()),
            "tools/list" => McpResponse::success(id, self.handle_tools_list()),
            "tools/call" => match serde_json::from_value::<ToolCall>(request.params) {
                Ok(call) => {
                    let result = self.call_tool(call, credentials).await;
                    match serde_json::to_value(result) {
                        Ok(value) => McpResponse::success(id, value),
                        Err(e) => {
                            let err = McpError::from(e);
                            McpResponse::error(id, err.jsonrpc_code(), err.to_string())
                        }
                    }
                }
                Err(e) => McpResponse::error(id, INVALID_PARAMS, format!("Invalid params: {}", e)),
            },
            "ping" => McpResponse::success(id, json!({})),
            method => {
                tracing::debug!(method, "unsupported method");
                McpResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
            }
        };

        Some(response)
    }

    /// Run a tool call with a client built from `credentials`
    ///
    /// Unknown tools and missing credentials fail before any request is made.
    pub async fn call_tool(&self, call: ToolCall, credentials: &TenantCredentials) -> ToolResult {
        if !tools::is_known_tool(&call.name) {
            tracing::warn!(tool = %call.name, "unknown tool");
            return ToolResult::failure(&McpError::UnknownTool(call.name));
        }

        let client = match AtlasDataClient::new(credentials) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "cannot build Data API client");
                return ToolResult::failure(&McpError::from(e));
            }
        };

        tools::call_tool(&client, &self.limits, call).await
    }

    /// Run the MCP server over stdio, one JSON-RPC message per line
    pub async fn run_stdio(&self, credentials: &TenantCredentials) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<McpRequest>(&line) {
                Ok(request) => self.handle_request(request, credentials).await,
                Err(e) => {
                    tracing::warn!(error = %e, "unparseable request");
                    Some(McpResponse::parse_error(&e))
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                stdout.write_all(&out).await?;
                stdout.flush().await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION
            },
            "capabilities": {
                "tools": {}
            },
            "instructions": SERVER_INSTRUCTIONS
        })
    }

    fn handle_tools_list(&self) -> Value {
        json!({ "tools": tools::get_tool_definitions() })
    }
}
