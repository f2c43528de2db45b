use serde_json::{Map, Value};

/// Deep-merges `overlay` onto `base`, returning a new value.
///
/// Right-biased: a key present in both takes the overlay's value unless both
/// sides hold objects, in which case the two objects are merged recursively.
/// Arrays are opaque and replaced whole. A non-object `base` counts as an
/// empty object, so the overlay is returned as-is.
pub fn merge(base: &Value, overlay: Option<&Value>) -> Value {
    let Some(overlay) = overlay else {
        return base.clone();
    };
    let Some(base_map) = base.as_object() else {
        return overlay.clone();
    };
    let Some(overlay_map) = overlay.as_object() else {
        return base.clone();
    };
    Value::Object(merge_maps(base_map, overlay_map))
}

fn merge_maps(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut output = base.clone();
    for (key, value) in overlay {
        let merged = match (base.get(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                Value::Object(merge_maps(existing, incoming))
            }
            _ => value.clone(),
        };
        output.insert(key.clone(), merged);
    }
    output
}
