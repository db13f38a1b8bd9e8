//! Lenient extraction of a JSON object from free-form model output.
//!
//! Models instructed to answer in pure JSON still wrap it in prose from time to
//! time. The parser takes everything between the first `{` and the last `}`;
//! anything it cannot read as an object degrades to `{"content": <text>}`.

use serde_json::{Map, Value};

/// Key used for the passthrough shape.
pub const CONTENT_KEY: &str = "content";

/// Extracts the embedded JSON object from `text`, or falls back to
/// `{"content": text.trim()}`.
pub fn parse_structured(text: &str) -> Map<String, Value> {
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            if let Ok(Value::Object(object)) = serde_json::from_str(&text[start..=end]) {
                return object;
            }
        }
    }

    passthrough(text)
}

fn passthrough(text: &str) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert(CONTENT_KEY.to_string(), Value::String(text.trim().to_string()));
    object
}
