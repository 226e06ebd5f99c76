//! Type predicates over [`serde_json::Value`]
//!
//! Primitive classification helpers used by the rule catalog and by the
//! engine's object/array detection. These are deliberately free functions so
//! the catalog modules stay thin wrappers around them.

use std::cmp::Ordering;

use serde_json::Value;

/// Returns `true` if the value is a JSON string.
pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Returns `true` if the value is a JSON number.
pub fn is_number(value: &Value) -> bool {
    value.is_number()
}

/// Returns `true` if the value is a JSON boolean.
pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

/// Returns `true` if the value is a JSON object.
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// Returns `true` if the value is a JSON array.
pub fn is_array(value: &Value) -> bool {
    value.is_array()
}

/// Returns `true` if the value is a number with no fractional part.
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        _ => false,
    }
}

/// Returns `true` if the value is an empty string, array, or object.
///
/// Scalars are never empty: they have no contents to be empty of.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Ordering between two values, where one exists.
///
/// Numbers compare numerically (through `f64`), strings lexicographically.
/// Every other pairing is incomparable and yields `None`, which comparison
/// rules report as a failure.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.as_str().cmp(y.as_str())),
        _ => None,
    }
}

/// Numeric view of a value, if it has one.
pub fn as_f64(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Length of a value: strings by character count, arrays by element count.
pub fn value_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Human form of a value used for `{VALUE}` substitution in messages.
///
/// Strings render without quotes; everything else uses its JSON form.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn classifies_json_types() {
        assert!(is_string(&json!("hi")));
        assert!(!is_string(&json!(1)));
        assert!(is_number(&json!(1.5)));
        assert!(is_boolean(&json!(false)));
        assert!(is_object(&json!({})));
        assert!(is_array(&json!([])));
        assert!(!is_array(&json!({"length": 2})));
    }

    #[test]
    fn integer_accepts_whole_floats() {
        assert!(is_integer(&json!(3)));
        assert!(is_integer(&json!(3.0)));
        assert!(!is_integer(&json!(3.5)));
        assert!(!is_integer(&json!("3")));
    }

    #[test]
    fn emptiness_is_about_contents() {
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!([])));
        assert!(is_empty(&json!({})));
        assert!(!is_empty(&json!("x")));
        assert!(!is_empty(&json!(0)));
    }

    #[test]
    fn compare_numbers_and_strings_only() {
        assert_eq!(compare(&json!(1), &json!(2)), Some(Ordering::Less));
        assert_eq!(compare(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare(&json!(1), &json!("1")), None);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        assert_eq!(value_len(&json!("Живa")), Some(4));
        assert_eq!(value_len(&json!([1, 2, 3])), Some(3));
        assert_eq!(value_len(&json!(12)), None);
    }

    #[test]
    fn display_unquotes_strings() {
        assert_eq!(display(&json!("abc")), "abc");
        assert_eq!(display(&json!(12)), "12");
        assert_eq!(display(&json!([1])), "[1]");
    }
}
