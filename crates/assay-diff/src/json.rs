//! Small document helpers.

use serde_json::Value;

use crate::path::JsonPath;

/// Returns true if `text` parses as a JSON document.
pub fn is_json(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok()
}

/// Lists every leaf of `value` with its path.
///
/// Scalars are leaves, and so are empty objects and arrays. Used to print
/// headers and payloads one line per field.
///
/// ```
/// use assay_diff::flatten;
/// use serde_json::json;
///
/// let leaves = flatten(&json!({"a": {"b": 1}, "c": []}));
/// let rendered: Vec<String> = leaves.iter().map(|(p, v)| format!("{p} = {v}")).collect();
/// assert_eq!(rendered, vec!["root['a']['b'] = 1", "root['c'] = []"]);
/// ```
pub fn flatten(value: &Value) -> Vec<(JsonPath, Value)> {
    let mut leaves = Vec::new();
    collect(&JsonPath::root(), value, &mut leaves);
    leaves
}

fn collect(path: &JsonPath, value: &Value, leaves: &mut Vec<(JsonPath, Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                collect(&path.key(key), child, leaves);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                collect(&path.index(index), child, leaves);
            }
        }
        leaf => leaves.push((path.clone(), leaf.clone())),
    }
}
