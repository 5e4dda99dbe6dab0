//! Lenient mapping from the raw API payload to `Transaction` values.
//!
//! # Design
//! The API reports numbers as strings, empty strings or `null`, sometimes as
//! plain JSON numbers. Every field is coerced on its own through
//! `coerce_int` / `coerce_float`, which never fail: anything that does not
//! look like a number is treated as "not provided". Only `transaction_price`
//! and `area` then fall back to zero; every other numeric field stays `None`.

use serde_json::{Map, Value};
use tracing::warn;

use crate::types::Transaction;

/// Convert the `"data"` array of a response payload, preserving order.
///
/// A payload without `"data"` yields an empty list.
pub fn parse_transactions(payload: &Value) -> Vec<Transaction> {
    let Some(data) = payload.get("data") else {
        return Vec::new();
    };
    let Some(items) = data.as_array() else {
        warn!(kind = json_kind(data), "ignoring non-array \"data\" field");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item.as_object() {
            Some(record) => Some(parse_transaction(record)),
            None => {
                warn!(index, kind = json_kind(item), "skipping non-object transaction record");
                None
            }
        })
        .collect()
}

/// Convert one raw record. Problems in one field never affect the others.
pub fn parse_transaction(record: &Map<String, Value>) -> Transaction {
    Transaction {
        transaction_price: coerce_int(record.get("TradePrice")).unwrap_or(0),
        area: coerce_float(record.get("Area")).unwrap_or(0.0),
        unit_price: coerce_float(record.get("UnitPrice")),
        prefecture: coerce_string(record.get("Prefecture")).unwrap_or_default(),
        city: coerce_string(record.get("Municipality")).unwrap_or_default(),
        district: coerce_string(record.get("DistrictName")),
        building_year: coerce_int(record.get("BuildingYear")).and_then(|year| i32::try_from(year).ok()),
        property_type: coerce_string(record.get("Type")).unwrap_or_default(),
        structure: coerce_string(record.get("Structure")),
        floor_area_ratio: coerce_float(record.get("FloorAreaRatio")),
        building_coverage: coerce_float(record.get("CoverageRatio")),
        frontage_road_width: coerce_float(record.get("Frontage")),
        transaction_period: coerce_string(record.get("Period")).unwrap_or_default(),
    }
}

/// Integer coercion: numeric strings (surrounding whitespace and digit
/// separators like `1_000` allowed), JSON numbers and booleans. Fractional
/// JSON numbers truncate toward zero.
pub fn coerce_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::String(s) => strip_digit_separators(s.trim())?.parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f.trunc() as i64)
        }),
        _ => None,
    }
}

/// Float coercion: same inputs as `coerce_int`.
pub fn coerce_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::String(s) => strip_digit_separators(s.trim())?.parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Drop `_` separators, which are only valid with a digit on both sides.
/// `None` for a misplaced separator.
fn strip_digit_separators(s: &str) -> Option<std::borrow::Cow<'_, str>> {
    if !s.contains('_') {
        return Some(s.into());
    }
    let bytes = s.as_bytes();
    let well_placed = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    well_placed.then(|| s.replace('_', "").into())
}

/// Strings are copied verbatim, numbers keep their JSON text.
fn coerce_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
