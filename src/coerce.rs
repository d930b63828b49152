//! Total conversions from loosely-typed JSON values into the fields of a statement.
//!
//! Every function in this module returns a value for every input. Payloads come from web forms
//! and spreadsheets, so amounts arrive as numbers, as strings, or not at all; a statement must
//! still render when any of them is garbage.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces `value` into a finite `f64`, returning `default` when that is not possible.
///
/// Numbers are taken as-is, strings are trimmed and parsed as decimal floats and booleans map to
/// `1.0`/`0.0`. Anything else, as well as NaN and the infinities, yields `default`.
pub fn coerce_f64(value: &Value, default: f64) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    match parsed {
        Some(number) if number.is_finite() => number,
        _ => default,
    }
}

/// Coerces `value` into display text.
///
/// Strings are returned unchanged; numbers and booleans use their JSON spelling. `null`, arrays
/// and objects carry no printable text and return `None`.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Serde adapter for numeric fields that default to zero.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value, 0.0))
}

/// Serde adapter for optional text fields whose fallback is decided by the consumer.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_text(&value))
}

/// Serde adapter for line-item text fields that default to the empty string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

/// Decodes `T` from a JSON object, falling back to `T::default()` for any other value.
///
/// Arrays are rejected up front: serde would otherwise map their elements onto struct fields
/// by position.
pub fn object_or_default<T>(value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    match value {
        Value::Object(_) => T::deserialize(value).unwrap_or_default(),
        _ => T::default(),
    }
}

/// Serde adapter for nested objects: a value of the wrong shape becomes `T::default()`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(object_or_default(value))
}

/// Serde adapter for lists of line items.
///
/// A non-array value yields an empty list. Each element is decoded on its own, so one malformed
/// entry degrades to a default line instead of dropping its neighbours.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };

    Ok(items.into_iter().map(object_or_default).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(coerce_f64(&json!(600.0), 0.0), 600.0);
        assert_eq!(coerce_f64(&json!(-37.5), 0.0), -37.5);
        assert_eq!(coerce_f64(&json!(2000), 0.0), 2000.0);
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(coerce_f64(&json!("0.3000"), 0.0), 0.3);
        assert_eq!(coerce_f64(&json!("  -12.25 "), 0.0), -12.25);
        assert_eq!(coerce_f64(&json!("1e3"), 0.0), 1000.0);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        assert_eq!(coerce_f64(&json!("abc"), 0.0), 0.0);
        assert_eq!(coerce_f64(&json!("1,000.00"), 0.0), 0.0);
        assert_eq!(coerce_f64(&json!(null), 0.0), 0.0);
        assert_eq!(coerce_f64(&json!([1, 2]), 0.0), 0.0);
        assert_eq!(coerce_f64(&json!({"amount": 1}), 7.0), 7.0);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(coerce_f64(&json!("NaN"), 0.0), 0.0);
        assert_eq!(coerce_f64(&json!("inf"), 0.0), 0.0);
        assert_eq!(coerce_f64(&json!("-infinity"), 0.0), 0.0);
    }

    #[test]
    fn arrays_do_not_fill_struct_fields_by_position() {
        #[derive(Debug, Default, PartialEq, serde::Deserialize)]
        struct Pair {
            #[serde(default)]
            first: f64,
        }

        assert_eq!(object_or_default::<Pair>(json!([3.0])), Pair::default());
        assert_eq!(object_or_default::<Pair>(json!({"first": 3.0})), Pair { first: 3.0 });
        assert_eq!(object_or_default::<Pair>(json!({"first": "x"})), Pair::default());
    }

    #[test]
    fn booleans_count_as_one_and_zero() {
        assert_eq!(coerce_f64(&json!(true), 0.0), 1.0);
        assert_eq!(coerce_f64(&json!(false), 5.0), 0.0);
    }

    #[test]
    fn text_uses_json_spelling_for_scalars() {
        assert_eq!(coerce_text(&json!("12/01/25")).as_deref(), Some("12/01/25"));
        assert_eq!(coerce_text(&json!(1743657425)).as_deref(), Some("1743657425"));
        assert_eq!(coerce_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(coerce_text(&json!(null)), None);
        assert_eq!(coerce_text(&json!(["a"])), None);
    }
}
