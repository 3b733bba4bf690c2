use serde_json::Value;

/// Get a string field of a JSON object, `None` if absent or not a string
pub(crate) fn string_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

// Re-export tool modules
pub mod fetch;
pub mod group;
pub mod normalize;
pub mod probe;
