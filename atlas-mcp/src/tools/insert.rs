//! Insert tools

use serde::Deserialize;
use serde_json::{json, Value};

use atlas_data::DataApi;

use super::args::{parse_documents, parse_input, parse_object, require};
use super::{documents_phrase, ToolDefinition};
use crate::error::McpResult;

/// mongodb_insert_one tool definition
pub fn insert_one_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_insert_one".to_string(),
        description: "Insert a single document into a collection. Returns the inserted document's _id.\n\nArguments:\n- database: database name\n- collection: collection name\n- document: JSON-encoded document (e.g. '{\"name\": \"Ada\", \"email\": \"ada@example.com\"}')".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["database", "collection", "document"],
            "properties": {
                "database": {
                    "type": "string",
                    "description": "Database name"
                },
                "collection": {
                    "type": "string",
                    "description": "Collection name"
                },
                "document": {
                    "type": "string",
                    "description": "JSON-encoded document to insert"
                }
            }
        }),
    }
}

/// mongodb_insert_many tool definition
pub fn insert_many_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_insert_many".to_string(),
        description: "Insert several documents into a collection. Returns the inserted _ids.\n\nArguments:\n- database: database name\n- collection: collection name\n- documents: JSON-encoded array of documents (e.g. '[{\"sku\": \"A1\"}, {\"sku\": \"B2\"}]')".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["database", "collection", "documents"],
            "properties": {
                "database": {
                    "type": "string",
                    "description": "Database name"
                },
                "collection": {
                    "type": "string",
                    "description": "Collection name"
                },
                "documents": {
                    "type": "string",
                    "description": "JSON-encoded array of documents to insert"
                }
            }
        }),
    }
}

/// Input for mongodb_insert_one
#[derive(Debug, Clone, Deserialize)]
pub struct InsertOneInput {
    pub database: String,
    pub collection: String,
    pub document: String,
}

/// Input for mongodb_insert_many
#[derive(Debug, Clone, Deserialize)]
pub struct InsertManyInput {
    pub database: String,
    pub collection: String,
    pub documents: String,
}

pub async fn insert_one(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: InsertOneInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let document = parse_object("document", &input.document)?;

    let result = api.insert_one(database, collection, document).await?;

    Ok(json!({
        "success": true,
        "insertedId": result.inserted_id,
        "message": "Document inserted successfully",
    }))
}

pub async fn insert_many(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: InsertManyInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let documents = parse_documents("documents", &input.documents)?;

    let result = api.insert_many(database, collection, documents).await?;
    let inserted = result.inserted_ids.len() as u64;

    Ok(json!({
        "success": true,
        "insertedIds": result.inserted_ids,
        "insertedCount": inserted,
        "message": format!("{} inserted successfully", documents_phrase(inserted)),
    }))
}
