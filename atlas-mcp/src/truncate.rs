//! Response size limiting
//!
//! Tool payloads are pretty-printed JSON. When the text exceeds the
//! character limit, the payload's result array is halved until it fits and
//! the payload is marked `truncated`.

use serde_json::{json, Value};

/// Keys holding the result array of a tool payload
const ARRAY_KEYS: [&str; 3] = ["documents", "results", "values"];

/// Render a payload as text no longer than `character_limit` where possible
///
/// Payloads without a result array are returned unchanged.
pub fn render(payload: Value, character_limit: usize) -> String {
    let text = serde_json::to_string_pretty(&payload).unwrap_or_default();
    if char_count(&text) <= character_limit {
        return text;
    }

    let Some(key) = ARRAY_KEYS
        .iter()
        .copied()
        .find(|key| payload.get(*key).is_some_and(Value::is_array))
    else {
        return text;
    };

    let mut payload = payload;
    let original = payload[key].as_array().map_or(0, Vec::len);
    let mut kept = original;

    loop {
        kept /= 2;
        if let Some(items) = payload[key].as_array_mut() {
            items.truncate(kept);
        }
        payload["truncated"] = json!(true);
        payload["truncationMessage"] = json!(format!(
            "Response truncated from {} to {} items to stay under {} characters. \
             Use 'limit', 'skip' or a 'projection' to narrow the results.",
            original, kept, character_limit
        ));

        let text = serde_json::to_string_pretty(&payload).unwrap_or_default();
        if char_count(&text) <= character_limit || kept == 0 {
            return text;
        }
    }
}

/// Length in characters, not bytes
fn char_count(text: &str) -> usize {
    text.chars().count()
}
