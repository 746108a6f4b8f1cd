//! Connectivity probe tool

use serde_json::{json, Value};

use atlas_data::DataApi;

use super::ToolDefinition;
use crate::error::{McpError, McpResult};

/// mongodb_test_connection tool definition
pub fn test_connection_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_test_connection".to_string(),
        description: "Check that the configured Data API credentials can reach MongoDB Atlas. Takes no arguments.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Probe the Data API; a failed probe becomes a `ConnectionFailed` error
pub async fn test_connection(api: &dyn DataApi) -> McpResult<Value> {
    let status = api.test_connection().await;
    tracing::debug!(connected = status.connected, "connection probe finished");

    if !status.connected {
        return Err(McpError::ConnectionFailed(status.message));
    }

    Ok(json!({
        "success": true,
        "connected": true,
        "message": status.message,
    }))
}
