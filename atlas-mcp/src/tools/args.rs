//! Decoding of flat tool arguments
//!
//! Tool arguments arrive as a flat map of strings, numbers and booleans.
//! Nested values are JSON-encoded strings and are decoded here, so nothing
//! past the tool boundary sees a raw string.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{McpError, McpResult};

/// Deserialize the argument map into a tool's input struct
pub fn parse_input<T: DeserializeOwned>(args: Value) -> McpResult<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| McpError::invalid_argument("arguments", e.to_string()))
}

/// Require a non-blank string argument
pub fn require<'a>(name: &str, value: &'a str) -> McpResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(McpError::MissingArgument(name.to_string()));
    }
    Ok(trimmed)
}

fn decode(name: &str, text: &str) -> McpResult<Value> {
    serde_json::from_str(text)
        .map_err(|e| McpError::invalid_argument(name, format!("invalid JSON: {}", e)))
}

/// Decode a JSON string that must hold an object
pub fn parse_object(name: &str, text: &str) -> McpResult<Value> {
    match decode(name, text)? {
        value @ Value::Object(_) => Ok(value),
        other => Err(McpError::invalid_argument(
            name,
            format!("expected a JSON object, got {}", type_name(&other)),
        )),
    }
}

/// Decode an optional object argument; absent or blank means `None`
pub fn parse_optional_object(name: &str, text: Option<&str>) -> McpResult<Option<Value>> {
    match text.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_object(name, text).map(Some),
    }
}

/// Decode an optional filter, defaulting to `{}` (match all)
pub fn parse_filter(text: Option<&str>) -> McpResult<Value> {
    Ok(parse_optional_object("filter", text)?.unwrap_or_else(|| Value::Object(Default::default())))
}

/// Decode a JSON string that must hold an array
pub fn parse_array(name: &str, text: &str) -> McpResult<Vec<Value>> {
    match decode(name, text)? {
        Value::Array(items) => Ok(items),
        other => Err(McpError::invalid_argument(
            name,
            format!("expected a JSON array, got {}", type_name(&other)),
        )),
    }
}

/// Decode a JSON array whose items are all objects
pub fn parse_documents(name: &str, text: &str) -> McpResult<Vec<Value>> {
    let items = parse_array(name, text)?;
    if items.is_empty() {
        return Err(McpError::invalid_argument(name, "expected at least one document"));
    }
    if let Some(index) = items.iter().position(|item| !item.is_object()) {
        return Err(McpError::invalid_argument(
            name,
            format!("item {} is not a JSON object", index),
        ));
    }
    Ok(items)
}

/// Field name usable in a `$field` path; a leading `$` is dropped
pub fn field_path(name: &str, value: &str) -> McpResult<String> {
    let field = require(name, value)?.trim_start_matches('$');
    if field.is_empty() {
        return Err(McpError::MissingArgument(name.to_string()));
    }
    Ok(field.to_string())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
