use serde_json::{Map, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have an object for the same key, recurse. A `null` in the
/// overlay leaves the base value alone. Otherwise, `overlay`'s value wins.
pub(crate) fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => Value::Object(merge_objects(base, overlay)),
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

fn merge_objects(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_val) in overlay {
        let merged = match base.remove(&key) {
            Some(base_val) => deep_merge(base_val, overlay_val),
            None => overlay_val,
        };
        base.insert(key, merged);
    }
    base
}
