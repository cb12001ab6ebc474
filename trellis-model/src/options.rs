//! Render options and the deep merge used to layer them.
//!
//! Options are JSON objects so call sites can pass arbitrary, kind-specific
//! settings (e.g. per-provider video player settings) without a fixed schema.

use serde_json::{Map, Value};

/// Call-site render options, keyed by option name.
pub type RenderOptions = Map<String, Value>;

/// Deep-merges `overlay` onto `base`.
///
/// Objects merge key by key, recursively. Any other overlay value replaces
/// the base value outright.
pub fn merge_options(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            let mut merged = base.clone();
            for (key, value) in overlay {
                let next = match merged.get(key) {
                    Some(existing) => merge_options(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, Value::Null) => base.clone(),
        (_, overlay) => overlay.clone(),
    }
}

/// Stable cache key for a set of options.
pub(crate) fn options_key(options: &RenderOptions) -> String {
    if options.is_empty() {
        String::new()
    } else {
        Value::Object(options.clone()).to_string()
    }
}
