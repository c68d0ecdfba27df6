//! Depth-first traversal of JSON payloads.

use serde_json::{Map, Value as JsonValue};

/// Visits every object node of `value` depth-first, parents before children.
///
/// `visit` returns whether it changed the node; the result is true if any
/// call did. Children are walked after the parent's visit, so properties the
/// visitor inserts are walked as well.
pub fn visit_objects_mut<F>(value: &mut JsonValue, visit: &mut F) -> bool
where
    F: FnMut(&mut Map<String, JsonValue>) -> bool,
{
    match value {
        JsonValue::Object(map) => {
            let mut changed = visit(map);
            for child in map.values_mut() {
                changed = visit_objects_mut(child, visit) || changed;
            }
            changed
        }
        JsonValue::Array(items) => {
            let mut changed = false;
            for child in items.iter_mut() {
                changed = visit_objects_mut(child, visit) || changed;
            }
            changed
        }
        _ => false,
    }
}

/// Returns the string at `object[part][field]`, if every step exists and the
/// leaf is a string.
pub fn nested_str<'a>(object: &'a Map<String, JsonValue>, part: &str, field: &str) -> Option<&'a str> {
    object.get(part)?.as_object()?.get(field)?.as_str()
}
