//! Aggregation tools
//!
//! `mongodb_aggregate` runs a caller-supplied pipeline. `mongodb_count`,
//! `mongodb_distinct` and `mongodb_group_by` are built on the same
//! `aggregate` action with a generated pipeline.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use atlas_data::DataApi;

use super::args::{field_path, parse_array, parse_filter, parse_input, parse_optional_object, require};
use super::ToolDefinition;
use crate::error::{McpError, McpResult};

/// mongodb_aggregate tool definition
pub fn aggregate_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_aggregate".to_string(),
        description: "Run an aggregation pipeline on a collection.\n\nArguments:\n- database: database name\n- collection: collection name\n- pipeline: JSON-encoded array of stages (e.g. '[{\"$match\": {\"status\": \"paid\"}}, {\"$group\": {\"_id\": \"$customer\", \"spent\": {\"$sum\": \"$amount\"}}}]')".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["database", "collection", "pipeline"],
            "properties": {
                "database": {
                    "type": "string",
                    "description": "Database name"
                },
                "collection": {
                    "type": "string",
                    "description": "Collection name"
                },
                "pipeline": {
                    "type": "string",
                    "description": "JSON-encoded array of pipeline stages"
                }
            }
        }),
    }
}

/// mongodb_count tool definition
pub fn count_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_count".to_string(),
        description: "Count documents matching a filter. Returns 0 when nothing matches.\n\nArguments:\n- database: database name\n- collection: collection name\n- filter (optional): JSON-encoded query, default {} (e.g. '{\"status\": \"active\"}')".to_string(),
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
                }
            }
        }),
    }
}

/// mongodb_distinct tool definition
pub fn distinct_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_distinct".to_string(),
        description: "List the distinct values of a field, sorted ascending. Null values are left out.\n\nArguments:\n- database: database name\n- collection: collection name\n- field: field name (e.g. 'status' or 'address.city')\n- filter (optional): JSON-encoded query applied first, default {}".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["database", "collection", "field"],
            "properties": {
                "database": {
                    "type": "string",
                    "description": "Database name"
                },
                "collection": {
                    "type": "string",
                    "description": "Collection name"
                },
                "field": {
                    "type": "string",
                    "description": "Field to collect distinct values of"
                },
                "filter": {
                    "type": "string",
                    "description": "JSON-encoded query filter"
                }
            }
        }),
    }
}

/// mongodb_group_by tool definition
pub fn group_by_tool() -> ToolDefinition {
    ToolDefinition {
        name: "mongodb_group_by".to_string(),
        description: "Group documents by a field and compute aggregates per group, largest groups first.\n\nArguments:\n- database: database name\n- collection: collection name\n- groupBy: field to group on (e.g. 'region')\n- filter (optional): JSON-encoded query applied first, default {}\n- aggregations (optional): JSON-encoded object choosing the aggregates, default count only. Keys: count (boolean), sum, avg, min, max (field names). Example: '{\"count\": true, \"sum\": \"amount\", \"avg\": \"amount\"}'. Results carry count, total, average, min and max respectively.".to_string(),
        input_schema: json!({
            "type": "object",
            "required": ["database", "collection", "groupBy"],
            "properties": {
                "database": {
                    "type": "string",
                    "description": "Database name"
                },
                "collection": {
                    "type": "string",
                    "description": "Collection name"
                },
                "groupBy": {
                    "type": "string",
                    "description": "Field to group on"
                },
                "filter": {
                    "type": "string",
                    "description": "JSON-encoded query filter"
                },
                "aggregations": {
                    "type": "string",
                    "description": "JSON-encoded aggregation selection"
                }
            }
        }),
    }
}

/// Input for mongodb_aggregate
#[derive(Debug, Clone, Deserialize)]
pub struct AggregateInput {
    pub database: String,
    pub collection: String,
    pub pipeline: String,
}

/// Input for mongodb_count
#[derive(Debug, Clone, Deserialize)]
pub struct CountInput {
    pub database: String,
    pub collection: String,
    #[serde(default)]
    pub filter: Option<String>,
}

/// Input for mongodb_distinct
#[derive(Debug, Clone, Deserialize)]
pub struct DistinctInput {
    pub database: String,
    pub collection: String,
    pub field: String,
    #[serde(default)]
    pub filter: Option<String>,
}

/// Input for mongodb_group_by
#[derive(Debug, Clone, Deserialize)]
pub struct GroupByInput {
    pub database: String,
    pub collection: String,
    #[serde(rename = "groupBy", alias = "group_by")]
    pub group_by: String,
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub aggregations: Option<String>,
}

/// Aggregates computed per group
///
/// `count` is on unless explicitly disabled; the others are field names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Aggregations {
    #[serde(default)]
    pub count: Option<bool>,
    #[serde(default)]
    pub sum: Option<String>,
    #[serde(default)]
    pub avg: Option<String>,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
}

impl Aggregations {
    /// Output field and accumulator for every selected aggregate
    pub fn accumulators(&self) -> Vec<(&'static str, Value)> {
        let mut selected = Vec::new();
        if self.count.unwrap_or(true) {
            selected.push(("count", json!({"$sum": 1})));
        }
        let fields = [
            ("total", "$sum", &self.sum),
            ("average", "$avg", &self.avg),
            ("min", "$min", &self.min),
            ("max", "$max", &self.max),
        ];
        for (key, operator, field) in fields {
            if let Some(field) = field {
                selected.push((key, json!({ operator: format!("${}", field) })));
            }
        }
        selected
    }

    /// Names of the fields each group document will carry besides its key
    pub fn output_fields(&self) -> Vec<&'static str> {
        self.accumulators().into_iter().map(|(key, _)| key).collect()
    }
}

/// `[$match, $count]`
pub fn count_pipeline(filter: Value) -> Vec<Value> {
    vec![json!({"$match": filter}), json!({"$count": "count"})]
}

/// `[$match, $group by field, $sort by key]`
pub fn distinct_pipeline(filter: Value, field: &str) -> Vec<Value> {
    vec![
        json!({"$match": filter}),
        json!({"$group": {"_id": format!("${}", field)}}),
        json!({"$sort": {"_id": 1}}),
    ]
}

/// `[$match, $group with selected accumulators, $sort by count desc then key]`
pub fn group_by_pipeline(filter: Value, group_by: &str, aggregations: &Aggregations) -> Vec<Value> {
    let mut group = Map::new();
    group.insert("_id".to_string(), json!(format!("${}", group_by)));

    for (key, accumulator) in aggregations.accumulators() {
        group.insert(key.to_string(), accumulator);
    }

    vec![
        json!({"$match": filter}),
        json!({"$group": group}),
        json!({"$sort": {"count": -1, "_id": 1}}),
    ]
}

/// Replace a group document's `_id` key with the caller's field name
pub fn rename_group_key(document: Value, group_by: &str) -> Value {
    match document {
        Value::Object(fields) if group_by != "_id" => {
            let mut renamed = Map::new();
            let key = fields.get("_id").cloned().unwrap_or(Value::Null);
            renamed.insert(group_by.to_string(), key);
            for (name, value) in fields {
                if name != "_id" {
                    renamed.insert(name, value);
                }
            }
            Value::Object(renamed)
        }
        other => other,
    }
}

fn parse_aggregations(text: Option<&str>) -> McpResult<Aggregations> {
    let Some(value) = parse_optional_object("aggregations", text)? else {
        return Ok(Aggregations::default());
    };
    let mut aggregations: Aggregations = serde_json::from_value(value)
        .map_err(|e| McpError::invalid_argument("aggregations", e.to_string()))?;

    for field in [
        &mut aggregations.sum,
        &mut aggregations.avg,
        &mut aggregations.min,
        &mut aggregations.max,
    ] {
        if let Some(name) = field.take() {
            *field = Some(field_path("aggregations", &name)?);
        }
    }
    Ok(aggregations)
}

pub async fn aggregate(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: AggregateInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let pipeline = parse_array("pipeline", &input.pipeline)?;
    if let Some(index) = pipeline.iter().position(|stage| !stage.is_object()) {
        return Err(McpError::invalid_argument(
            "pipeline",
            format!("stage {} is not a JSON object", index),
        ));
    }

    let result = api.aggregate(database, collection, pipeline).await?;

    Ok(json!({
        "success": true,
        "count": result.documents.len(),
        "documents": result.documents,
    }))
}

pub async fn count(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: CountInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let filter = parse_filter(input.filter.as_deref())?;

    let result = api
        .aggregate(database, collection, count_pipeline(filter.clone()))
        .await?;
    let count = result
        .documents
        .first()
        .and_then(|doc| doc.get("count"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    Ok(json!({
        "success": true,
        "count": count,
        "filter": filter,
    }))
}

pub async fn distinct(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: DistinctInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let field = field_path("field", &input.field)?;
    let filter = parse_filter(input.filter.as_deref())?;

    let result = api
        .aggregate(database, collection, distinct_pipeline(filter, &field))
        .await?;
    let values: Vec<Value> = result
        .documents
        .into_iter()
        .filter_map(|mut doc| doc.get_mut("_id").map(Value::take))
        .filter(|value| !value.is_null())
        .collect();

    Ok(json!({
        "success": true,
        "field": field,
        "count": values.len(),
        "values": values,
    }))
}

pub async fn group_by(api: &dyn DataApi, args: Value) -> McpResult<Value> {
    let input: GroupByInput = parse_input(args)?;
    let database = require("database", &input.database)?;
    let collection = require("collection", &input.collection)?;
    let group_key = field_path("groupBy", &input.group_by)?;
    let filter = parse_filter(input.filter.as_deref())?;
    let aggregations = parse_aggregations(input.aggregations.as_deref())?;
    if aggregations.output_fields().contains(&group_key.as_str()) {
        return Err(McpError::invalid_argument(
            "groupBy",
            format!(
                "'{}' clashes with a computed field of the same name; leave that aggregation out",
                group_key
            ),
        ));
    }

    let pipeline = group_by_pipeline(filter, &group_key, &aggregations);
    let result = api.aggregate(database, collection, pipeline).await?;
    let results: Vec<Value> = result
        .documents
        .into_iter()
        .map(|doc| rename_group_key(doc, &group_key))
        .collect();

    Ok(json!({
        "success": true,
        "groupBy": group_key,
        "count": results.len(),
        "results": results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pipeline() {
        assert_eq!(
            count_pipeline(json!({"status": "open"})),
            vec![
                json!({"$match": {"status": "open"}}),
                json!({"$count": "count"})
            ]
        );
    }

    #[test]
    fn test_distinct_pipeline() {
        assert_eq!(
            distinct_pipeline(json!({}), "status"),
            vec![
                json!({"$match": {}}),
                json!({"$group": {"_id": "$status"}}),
                json!({"$sort": {"_id": 1}})
            ]
        );
    }

    #[test]
    fn test_group_by_pipeline_defaults_to_count() {
        let pipeline = group_by_pipeline(json!({}), "region", &Aggregations::default());
        assert_eq!(
            pipeline[1],
            json!({"$group": {"_id": "$region", "count": {"$sum": 1}}})
        );
    }

    #[test]
    fn test_group_by_pipeline_all_accumulators() {
        let aggregations = Aggregations {
            count: Some(true),
            sum: Some("amount".to_string()),
            avg: Some("amount".to_string()),
            min: Some("price".to_string()),
            max: Some("price".to_string()),
        };
        let pipeline = group_by_pipeline(json!({"paid": true}), "region", &aggregations);

        assert_eq!(pipeline[0], json!({"$match": {"paid": true}}));
        assert_eq!(
            pipeline[1],
            json!({"$group": {
                "_id": "$region",
                "count": {"$sum": 1},
                "total": {"$sum": "$amount"},
                "average": {"$avg": "$amount"},
                "min": {"$min": "$price"},
                "max": {"$max": "$price"}
            }})
        );
        assert_eq!(pipeline[2], json!({"$sort": {"count": -1, "_id": 1}}));
    }

    #[test]
    fn test_sort_stage_key_order() {
        let pipeline = group_by_pipeline(json!({}), "region", &Aggregations::default());
        let keys: Vec<&String> = pipeline[2]["$sort"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["count", "_id"]);
    }

    #[test]
    fn test_count_can_be_disabled() {
        let aggregations = Aggregations {
            count: Some(false),
            sum: Some("amount".to_string()),
            ..Default::default()
        };
        let pipeline = group_by_pipeline(json!({}), "region", &aggregations);
        assert!(pipeline[1]["$group"].get("count").is_none());
        assert_eq!(pipeline[1]["$group"]["total"], json!({"$sum": "$amount"}));
    }

    #[test]
    fn test_output_fields() {
        assert_eq!(Aggregations::default().output_fields(), vec!["count"]);

        let aggregations = Aggregations {
            count: Some(false),
            avg: Some("price".to_string()),
            max: Some("price".to_string()),
            ..Default::default()
        };
        assert_eq!(aggregations.output_fields(), vec!["average", "max"]);
    }

    #[test]
    fn test_rename_group_key() {
        let renamed = rename_group_key(json!({"_id": "EU", "count": 3}), "region");
        assert_eq!(renamed, json!({"region": "EU", "count": 3}));
        assert!(renamed.get("_id").is_none());

        let untouched = rename_group_key(json!({"_id": "EU"}), "_id");
        assert_eq!(untouched, json!({"_id": "EU"}));
    }

    #[test]
    fn test_parse_aggregations() {
        assert_eq!(parse_aggregations(None).unwrap(), Aggregations::default());

        let parsed = parse_aggregations(Some(r#"{"count": true, "sum": "$amount"}"#)).unwrap();
        assert_eq!(parsed.count, Some(true));
        assert_eq!(parsed.sum.as_deref(), Some("amount"));

        assert!(parse_aggregations(Some(r#"{"sum": 5}"#)).is_err());
        assert!(parse_aggregations(Some("[true]")).is_err());
    }
}
