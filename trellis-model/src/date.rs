//! Date-kind rendering.

use crate::kind::escape_for;
use crate::options::RenderOptions;
use crate::prototype::FieldPrototype;
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde_json::Value;
use std::fmt::Write;

const STORED_DATE: &str = "%Y-%m-%d";

/// Formats `raw` with a strftime pattern from the call site or the field
/// declaration. Values that don't parse as `YYYY-MM-DD`, or invalid
/// patterns, render like plain strings. So do patterns asking for a time
/// of day, which a bare date cannot supply.
pub(crate) fn generate(
    format: &str,
    raw: &str,
    prototype: &FieldPrototype,
    options: &RenderOptions,
) -> String {
    let pattern = options
        .get("format")
        .or_else(|| prototype.option("format"))
        .and_then(Value::as_str);

    let Some(pattern) = pattern else {
        return escape_for(format, raw);
    };
    let Ok(date) = NaiveDate::parse_from_str(raw.trim(), STORED_DATE) else {
        return escape_for(format, raw);
    };

    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return escape_for(format, raw);
    }
    let mut out = String::new();
    if write!(out, "{}", date.format_with_items(items.iter())).is_err() {
        return escape_for(format, raw);
    }
    escape_for(format, &out)
}
