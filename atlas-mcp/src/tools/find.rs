//! Query tools: find one / find many

use serde::Deserialize;
use serde_json::{json, Value};

use atlas_data::{DataApi, FindOptions};

use super::args::{parse_filter, parse_input, parse_optional_object, require};
use super::ToolDefinition;
use crate::config::Limits;
use crate::error::McpResult;

/// mongodb_find_one tool definition
pub fn find_one_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_find_one".to_string(),
        description: "Find a single document in a collection. Returns the first document matching the filter, or null if none matches.\n\nArguments:\n- database: database name\n- collection: collection name\n- filter (optional): JSON-encoded query, default {} (e.g. '{\"email\": \"ada@example.com\"}')\n- projection (optional): JSON-encoded fields to include or exclude (e.g. '{\"name\": 1, \"_id\": 0}')".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["database", "collection"],
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
                    "description": "JSON-encoded query filter, e.g. '{\"_id\": {\"$oid\": \"64b7...\"}}'"
                },
                "projection": {
                    "type": "string",
                    "description": "JSON-encoded projection, e.g. '{\"name\": 1}'"
                }
            }
        }),
    }
}

/// mongodb_find tool definition
pub fn find_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_find".to_string(),
        description: "Find documents in a collection.\n\nArguments:\n- database: database name\n- collection: collection name\n- filter (optional): JSON-encoded query, default {} (e.g. '{\"status\": \"active\", \"age\": {\"$gte\": 21}}')\n- projection (optional): JSON-encoded projection (e.g. '{\"name\": 1, \"email\": 1}')\n- sort (optional): JSON-encoded sort (e.g. '{\"createdAt\": -1}')\n- limit (optional): maximum documents, default 20, at most 1000\n- skip (optional): documents to skip, for paging".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["database", "collection"],
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
                },
                "projection": {
                    "type": "string",
                    "description": "JSON-encoded projection"
                },
                "sort": {
                    "type": "string",
                    "description": "JSON-encoded sort specification"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of documents (1-1000, default 20)"
                },
                "skip": {
                    "type": "integer",
                    "description": "Number of documents to skip"
                }
            }
        }),
    }
}

/// Input for mongodb_find_one
#[derive(Debug, Clone, Deserialize)]
pub struct FindOneInput {
    pub database: String,
    pub collection: String,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub projection: Option<String>,
}

/// Input for mongodb_find
#[derive(Debug, Clone, Deserialize)]
pub struct FindInput {
    pub database: String,
    pub collection: String,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub projection: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub skip: Option<i64>,
}

pub async fn find_one(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: FindOneInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let filter = parse_filter(input.filter.as_deref())?;
    let projection = parse_optional_object("projection", input.projection.as_deref())?;

    let result = api
        .find_one(database, collection, Some(filter), projection)
        .await?;

    Ok(json!({
        "success": true,
        "document": result.document,
    }))
}

pub async fn find(api: &dyn DataApi, limits: &Limits, args: Value) -> McpResult<Value> {
    let input: FindInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let filter = parse_filter(input.filter.as_deref())?;

    let mut options = FindOptions::default().with_limit(limits.page_limit(input.limit));
    options.projection = parse_optional_object("projection", input.projection.as_deref())?;
    options.sort = parse_optional_object("sort", input.sort.as_deref())?;
    options.skip = input.skip.filter(|skip| *skip > 0).map(|skip| skip as u64);

    let result = api.find(database, collection, Some(filter), options).await?;

    Ok(json!({
        "success": true,
        "count": result.documents.len(),
        "documents": result.documents,
    }))
}
