use serde_json::Value;

/// Flatten a JSON value into a string fit for a user attribute.
/// Strings are taken as-is, everything else in its JSON form, and control
/// characters are stripped.
pub fn value_to_string(value: Value) -> String {
    let raw = match value {
        Value::String(s) => s,
        other => other.to_string(),
    };
    raw.chars().filter(|c| !c.is_control()).collect()
}
