//! MCP Tool implementations
//!
//! These are the tools exposed to agents through the MCP protocol. Every
//! tool takes a flat argument map; nested data travels as JSON strings and
//! is decoded by [`args`] before the Data API is called.

pub mod aggregate;
pub mod args;
pub mod connection;
pub mod delete;
pub mod find;
pub mod insert;
pub mod update;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use atlas_data::DataApi;

use crate::config::Limits;
use crate::error::{McpError, McpResult};
use crate::truncate;

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name
    pub name: String,

    /// Description shown to the agent
    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Tool call request
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Tool call response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none", default)]
    pub is_error: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: text.into(),
        }
    }
}

impl ToolResult {
    /// Success envelope around an already rendered payload
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: None,
        }
    }

    /// Failure envelope: `{"error": "Error: ...", "details": {...}}`
    pub fn failure(err: &McpError) -> Self {
        let mut error = format!("Error: {}", err);
        if err.is_retryable() {
            error.push_str(" (retryable)");
        }

        let body = json!({
            "error": error,
            "details": err.details(),
        });

        Self {
            content: vec![ToolContent::text(
                serde_json::to_string_pretty(&body).unwrap_or_default(),
            )],
            is_error: Some(true),
        }
    }

    /// Whether this is a failure envelope
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Text of the first content item
    pub fn text(&self) -> &str {
        self.content.first().map_or("", |c| c.text.as_str())
    }
}

/// Get all tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        find::find_one_tool(),
        find::find_tool(),
        insert::insert_one_tool(),
        insert::insert_many_tool(),
        update::update_one_tool(),
        update::update_many_tool(),
        delete::delete_one_tool(),
        delete::delete_many_tool(),
        aggregate::aggregate_tool(),
        aggregate::count_tool(),
        aggregate::distinct_tool(),
        aggregate::group_by_tool(),
        connection::test_connection_tool(),
    ]
}

/// Whether a tool with this name exists
pub fn is_known_tool(name: &str) -> bool {
    get_tool_definitions().iter().any(|t| t.name == name)
}

/// Run one tool call against a Data API client
///
/// Never fails: errors become failure envelopes.
pub async fn call_tool(api: &dyn DataApi, limits: &Limits, call: ToolCall) -> ToolResult {
    tracing::info!(tool = %call.name, "tool call");

    match dispatch(api, limits, &call.name, call.arguments).await {
        Ok(payload) => ToolResult::success(truncate::render(payload, limits.character_limit)),
        Err(err) => {
            tracing::warn!(
                tool = %call.name,
                code = err.error_code(),
                error = %err,
                "tool call failed"
            );
            ToolResult::failure(&err)
        }
    }
}

async fn dispatch(api: &dyn DataApi, limits: &Limits, name: &str, args: Value) -> McpResult<Value> {
    match name {
        "mongodb_find_one" => find::find_one(api, args).await,
        "mongodb_find" => find::find(api, limits, args).await,
        "mongodb_insert_one" => insert::insert_one(api, args).await,
        "mongodb_insert_many" => insert::insert_many(api, args).await,
        "mongodb_update_one" => update::update_one(api, args).await,
        "mongodb_update_many" => update::update_many(api, args).await,
        "mongodb_delete_one" => delete::delete_one(api, args).await,
        "mongodb_delete_many" => delete::delete_many(api, args).await,
        "mongodb_aggregate" => aggregate::aggregate(api, args).await,
        "mongodb_count" => aggregate::count(api, args).await,
        "mongodb_distinct" => aggregate::distinct(api, args).await,
        "mongodb_group_by" => aggregate::group_by(api, args).await,
        "mongodb_test_connection" => connection::test_connection(api).await,
        _ => Err(McpError::UnknownTool(name.to_string())),
    }
}

/// Singular or plural "document" phrase for messages
pub(crate) fn documents_phrase(count: u64) -> String {
    if count == 1 {
        "1 document".to_string()
    } else {
        format!("{} documents", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_are_unique() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 13);

        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 13);
        assert!(names.iter().all(|n| n.starts_with("mongodb_")));
    }

    #[test]
    fn test_schemas_use_flat_argument_types() {
        for tool in get_tool_definitions() {
            let properties = tool.input_schema["properties"].as_object().unwrap();
            for (name, schema) in properties {
                let ty = schema["type"].as_str().unwrap();
                assert!(
                    matches!(ty, "string" | "number" | "integer" | "boolean"),
                    "{}.{} has nested type {}",
                    tool.name,
                    name,
                    ty
                );
            }
        }
    }

    #[test]
    fn test_failure_envelope_marks_retryable() {
        let err = McpError::from(atlas_data::AtlasError::RateLimit { retry_after: 30 });
        let result = ToolResult::failure(&err);

        assert!(result.is_error());
        let body: Value = serde_json::from_str(result.text()).unwrap();
        assert_eq!(
            body["error"],
            "Error: Rate limit exceeded. Retry after 30 seconds. (retryable)"
        );
        assert_eq!(body["details"]["retryAfter"], 30);
    }

    #[test]
    fn test_success_envelope_omits_is_error() {
        let value = serde_json::to_value(ToolResult::success("{}")).unwrap();
        assert!(value.get("isError").is_none());
        assert_eq!(value["content"][0]["type"], "text");
    }

    #[test]
    fn test_documents_phrase() {
        assert_eq!(documents_phrase(1), "1 document");
        assert_eq!(documents_phrase(0), "0 documents");
        assert_eq!(documents_phrase(7), "7 documents");
    }
}
