//! Update tools

use serde::Deserialize;
use serde_json::{json, Value};

use atlas_data::{DataApi, UpdateResult};

use super::args::{parse_input, parse_object, require};
use super::{documents_phrase, ToolDefinition};
use crate::error::McpResult;

/// mongodb_update_one tool definition
pub fn update_one_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_update_one".to_string(),
        description: "Update the first document matching a filter.\n\nArguments:\n- database: database name\n- collection: collection name\n- filter: JSON-encoded query (e.g. '{\"email\": \"ada@example.com\"}')\n- update: JSON-encoded update operators (e.g. '{\"$set\": {\"status\": \"inactive\"}}')\n- upsert (optional): insert a new document when nothing matches, default false".to_string(),
        input_schema: update_schema(),
    }
}

/// mongodb_update_many tool definition
pub fn update_many_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_update_many".to_string(),
        description: "Update every document matching a filter.\n\nArguments:\n- database: database name\n- collection: collection name\n- filter: JSON-encoded query (e.g. '{\"status\": \"trial\"}')\n- update: JSON-encoded update operators (e.g. '{\"$inc\": {\"visits\": 1}}')\n- upsert (optional): insert a new document when nothing matches, default false".to_string(),
        input_schema: update_schema(),
    }
}

fn update_schema() -> Value {
    json!({
        "type": "object",
        "required": ["database", "collection", "filter", "update"],
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
            "update": {
                "type": "string",
                "description": "JSON-encoded update document"
            },
            "upsert": {
                "type": "boolean",
                "description": "Insert when no document matches (default false)"
            }
        }
    })
}

/// Input for mongodb_update_one / mongodb_update_many
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInput {
    pub database: String,
    pub collection: String,
    pub filter: String,
    pub update: String,
    #[serde(default)]
    pub upsert: Option<bool>,
}

/// Summary message for an update result
///
/// Modified documents win over an upsert; otherwise nothing changed.
pub fn update_message(result: &UpdateResult, many: bool) -> String {
    if result.modified_count > 0 {
        if many {
            format!("{} updated successfully", documents_phrase(result.modified_count))
        } else {
            "Document updated successfully".to_string()
        }
    } else if result.upserted_id.is_some() {
        "Document upserted successfully".to_string()
    } else {
        "No documents modified".to_string()
    }
}

pub async fn update_one(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    run_update(api, args, false).await
}

pub async fn update_many(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    run_update(api, args, true).await
}

async fn run_update(api: &dyn DataApi, args: Value, many: bool) -> McpResult<Value> {
    let input: UpdateInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let filter = parse_object("filter", &input.filter)?;
    let update = parse_object("update", &input.update)?;
    let upsert = Some(input.upsert.unwrap_or(false));

    let result = if many {
        api.update_many(database, collection, filter, update, upsert)
            .await?
    } else {
        api.update_one(database, collection, filter, update, upsert)
            .await?
    };

    let mut payload = json!({
        "success": true,
        "matchedCount": result.matched_count,
        "modifiedCount": result.modified_count,
        "message": update_message(&result, many),
    });
    if let Some(upserted_id) = result.upserted_id {
        payload["upsertedId"] = upserted_id;
    }

    Ok(payload)
}
