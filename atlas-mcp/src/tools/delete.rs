//! Delete tools

use serde::Deserialize;
use serde_json::{json, Value};

use atlas_data::DataApi;

use super::args::{parse_input, parse_object, require};
use super::{documents_phrase, ToolDefinition};
use crate::error::McpResult;

/// mongodb_delete_one tool definition
pub fn delete_one_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_delete_one".to_string(),
        description: "Delete the first document matching a filter.\n\nArguments:\n- database: database name\n- collection: collection name\n- filter: JSON-encoded query (e.g. '{\"_id\": {\"$oid\": \"64b7f0c2e4b0a1a2b3c4d5e6\"}}')".to_string(),
        input_schema: delete_schema(),
    }
}

/// mongodb_delete_many tool definition
pub fn delete_many_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_delete_many".to_string(),
        description: "Delete every document matching a filter. An empty filter '{}' deletes the whole collection's documents.\n\nArguments:\n- database: database name\n- collection: collection name\n- filter: JSON-encoded query (e.g. '{\"status\": \"expired\"}')".to_string(),
        input_schema: delete_schema(),
    }
}

fn delete_schema() -> Value {
    json!({
        "type": "object",
        "required": ["database", "collection", "filter"],
        "properties": {
            "database": {
                "type": "string",
                "description": "Database name"
            },
            "collection": {
                "type": "string",
                "description": "Collection name"
            },
            "filter": {
                "type": "string",
                "description": "JSON-encoded query filter"
            }
        }
    })
}

/// Input for mongodb_delete_one / mongodb_delete_many
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteInput {
    pub database: String,
    pub collection: String,
    pub filter: String,
}

pub async fn delete_one(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: DeleteInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let filter = parse_object("filter", &input.filter)?;

    let result = api.delete_one(database, collection, filter).await?;
    let message = if result.deleted_count > 0 {
        "Document deleted successfully"
    } else {
        "No document found to delete"
    };

    Ok(json!({
        "success": true,
        "deletedCount": result.deleted_count,
        "message": message,
    }))
}

pub async fn delete_many(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: DeleteInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let filter = parse_object("filter", &input.filter)?;

    let result = api.delete_many(database, collection, filter).await?;
    let message = if result.deleted_count > 0 {
        format!("{} deleted successfully", documents_phrase(result.deleted_count))
    } else {
        "No documents found to delete".to_string()
    };

    Ok(json!({
        "success": true,
        "deletedCount": result.deleted_count,
        "message": message,
    }))
}
