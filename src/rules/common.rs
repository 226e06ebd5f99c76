//! General-purpose rules: equality, comparisons, lengths, contents
//!
//! Every factory here returns a plain scalar [`Rule`] built on the shared
//! [`predicates`] helpers. Comparison rules work on numbers numerically and
//! on strings lexicographically; applying one to any other type fails.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use crate::predicates;
use crate::rule::Rule;

/// A rule that always fails with the given message template.
///
/// Useful as a placeholder branch inside `try` or for surfacing a custom
/// message at a known point in a chain.
pub fn error(template: impl Into<String>) -> Rule {
    Rule::scalar("error", template, |_, _| false)
}

/// The value must equal at least one of the allowed values.
pub fn equals(allowed: Vec<Value>) -> Rule {
    let template = format!("{{PATH}} should equal {}", list_string(&allowed, "or"));
    let args = allowed.clone();
    Rule::scalar("equals", template, move |value, _| allowed.contains(value))
        .with_args(args)
}

/// The value must be a number with no fractional part.
pub fn integer() -> Rule {
    Rule::scalar("integer", "{PATH} should be an integer", |value, _| {
        predicates::is_integer(value)
    })
}

/// The value must be a number with at most `max` decimal places.
pub fn precision(max: u32) -> Rule {
    let template = format!("{{PATH}} should have {max} decimal places");
    Rule::scalar("precision", template, move |value, _| {
        let Some(n) = predicates::as_f64(value) else {
            return false;
        };
        let rendered = format!("{n}");
        let decimals = rendered.split('.').nth(1).map_or(0, str::len);
        decimals as u32 <= max
    })
    .with_args(vec![Value::from(max)])
}

/// The value must be a number divisible by `divisor`.
pub fn divisible_by(divisor: f64) -> Rule {
    let template = format!("{{PATH}} should be divisible by {divisor}");
    Rule::scalar("divisible_by", template, move |value, _| {
        predicates::as_f64(value).is_some_and(|n| n % divisor == 0.0)
    })
    .with_args(vec![Value::from(divisor)])
}

/// The value must be strictly less than `limit`.
pub fn lt(limit: Value) -> Rule {
    ordered("lt", "less than", limit, |ord| ord == Ordering::Less)
}

/// The value must be less than or equal to `limit`.
pub fn lte(limit: Value) -> Rule {
    ordered("lte", "less than or equal to", limit, |ord| ord != Ordering::Greater)
}

/// The value must be strictly greater than `limit`.
pub fn gt(limit: Value) -> Rule {
    ordered("gt", "greater than", limit, |ord| ord == Ordering::Greater)
}

/// The value must be greater than or equal to `limit`.
pub fn gte(limit: Value) -> Rule {
    ordered("gte", "greater than or equal to", limit, |ord| ord != Ordering::Less)
}

fn ordered(
    name: &'static str,
    phrase: &str,
    limit: Value,
    accepts: impl Fn(Ordering) -> bool + Send + Sync + 'static,
) -> Rule {
    let template = format!("{{PATH}} should be {phrase} {}", predicates::display(&limit));
    let args = vec![limit.clone()];
    Rule::scalar(name, template, move |value, _| {
        predicates::compare(value, &limit).is_some_and(&accepts)
    })
    .with_args(args)
}

/// The value's length must be at least `min` and, when given, at most `max`.
///
/// Strings measure in characters, arrays in elements; other types fail.
pub fn length(min: usize, max: Option<usize>) -> Rule {
    let template = match max {
        None => format!("{{PATH}} should have a length of at least {min}"),
        Some(max) => format!("{{PATH}} should have a length within {min} and {max}"),
    };
    let mut args = vec![Value::from(min)];
    if let Some(max) = max {
        args.push(Value::from(max));
    }
    Rule::scalar("length", template, move |value, _| {
        predicates::value_len(value)
            .is_some_and(|len| len >= min && max.map_or(true, |max| len <= max))
    })
    .with_args(args)
}

/// A string must start with the given prefix; an array's first element must
/// equal the given value.
pub fn starts_with(find: Value) -> Rule {
    let template = format!("{{PATH}} should start with {}", predicates::display(&find));
    let args = vec![find.clone()];
    Rule::scalar("starts_with", template, move |value, _| match (value, &find) {
        (Value::String(s), Value::String(prefix)) => s.starts_with(prefix.as_str()),
        (Value::Array(items), first) => items.first() == Some(first),
        _ => false,
    })
    .with_args(args)
}

/// A string must end with the given suffix; an array's last element must
/// equal the given value.
pub fn ends_with(find: Value) -> Rule {
    let template = format!("{{PATH}} should end with {}", predicates::display(&find));
    let args = vec![find.clone()];
    Rule::scalar("ends_with", template, move |value, _| match (value, &find) {
        (Value::String(s), Value::String(suffix)) => s.ends_with(suffix.as_str()),
        (Value::Array(items), last) => items.last() == Some(last),
        _ => false,
    })
    .with_args(args)
}

/// The value must contain every needle: substrings of a string, or elements
/// of an array. Zero needles fails.
pub fn contains(needles: Vec<Value>) -> Rule {
    let template = format!("{{PATH}} should contain {}", list_string(&needles, "and"));
    let args = needles.clone();
    Rule::scalar("contains", template, move |value, _| {
        if needles.is_empty() {
            return false;
        }
        match value {
            Value::String(s) => needles
                .iter()
                .all(|needle| needle.as_str().is_some_and(|n| s.contains(n))),
            Value::Array(items) => needles.iter().all(|needle| items.contains(needle)),
            _ => false,
        }
    })
    .with_args(args)
}

/// A string must match the given regular expression.
pub fn matches(regex: Regex) -> Rule {
    let template = format!("{{PATH}} should match {regex}");
    let args = vec![Value::from(regex.as_str())];
    Rule::scalar("matches", template, move |value, _| {
        value.as_str().is_some_and(|s| regex.is_match(s))
    })
    .with_args(args)
}

/// A string must equal its lowercase form.
pub fn lower_case() -> Rule {
    Rule::scalar("lower_case", "{PATH} should be lower case", |value, _| {
        value.as_str().is_some_and(|s| s.to_lowercase() == s)
    })
}

/// A string must equal its uppercase form.
pub fn upper_case() -> Rule {
    Rule::scalar("upper_case", "{PATH} should be upper case", |value, _| {
        value.as_str().is_some_and(|s| s.to_uppercase() == s)
    })
}

/// A string must parse as JSON.
pub fn json() -> Rule {
    Rule::scalar("json", "{PATH} should be JSON", |value, _| {
        value
            .as_str()
            .is_some_and(|s| serde_json::from_str::<Value>(s).is_ok())
    })
}

/// The value must be an empty string, array, or object.
pub fn empty() -> Rule {
    Rule::scalar("empty", "{PATH} should be empty", |value, _| {
        predicates::is_empty(value)
    })
}

/// An array's elements (or an object's member values) must be pairwise
/// distinct.
pub fn unique() -> Rule {
    Rule::scalar("unique", "{PATH} should be unique", |value, _| {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => map.values().collect(),
            _ => return false,
        };
        for (i, item) in items.iter().enumerate() {
            if items[..i].contains(item) {
                return false;
            }
        }
        true
    })
}

/// An array must be sorted ascending under [`predicates::compare`].
///
/// Incomparable neighbors (mixed types) count as unsorted.
pub fn sorted() -> Rule {
    Rule::scalar("sorted", "{PATH} should be sorted", |value, _| {
        let Some(items) = value.as_array() else {
            return false;
        };
        items.windows(2).all(|pair| {
            predicates::compare(&pair[0], &pair[1])
                .is_some_and(|ord| ord != Ordering::Greater)
        })
    })
}

/// Joins values for equals/contains message templates: `a`, `a and b`,
/// `a, b or c`.
fn list_string(values: &[Value], conjunction: &str) -> String {
    let shown: Vec<String> = values.iter().map(predicates::display).collect();
    match shown.as_slice() {
        [] => "nothing".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} {conjunction} {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn equals_is_any_of_with_strict_equality() {
        let chain = Chain::default().equals(vec![json!("a"), json!(1)]);
        assert!(chain.execute(&json!("a")).is_ok());
        assert!(chain.execute(&json!(1)).is_ok());
        assert!(chain.execute(&json!("1")).is_err());
    }

    #[test]
    fn equals_records_its_arguments() {
        let failure = Chain::default()
            .equals(vec![json!("a"), json!("b")])
            .execute(&json!("c"))
            .unwrap_err();
        let record = &failure.errors.as_flat().unwrap()[0];
        assert_eq!(record.args, Some(vec![json!("a"), json!("b")]));
        assert_eq!(record.message(""), " should equal a or b");
    }

    #[test]
    fn precision_counts_decimal_places() {
        let chain = Chain::default().precision(2);
        assert!(chain.execute(&json!(123.45)).is_ok());
        assert!(chain.execute(&json!(123)).is_ok());
        assert!(chain.execute(&json!(0.123)).is_err());
        assert!(chain.execute(&json!("1.2")).is_err());
    }

    #[test]
    fn divisible_by_works_on_numbers() {
        let chain = Chain::default().divisible_by(3.0);
        assert!(chain.execute(&json!(9)).is_ok());
        assert!(chain.execute(&json!(10)).is_err());
    }

    #[test]
    fn comparisons_cover_numbers_and_strings() {
        assert!(Chain::default().lt(json!(10)).execute(&json!(9)).is_ok());
        assert!(Chain::default().lt(json!(10)).execute(&json!(10)).is_err());
        assert!(Chain::default().lte(json!(10)).execute(&json!(10)).is_ok());
        assert!(Chain::default().gt(json!("a")).execute(&json!("b")).is_ok());
        assert!(Chain::default().gte(json!(5)).execute(&json!(5)).is_ok());
        // mixed types are incomparable
        assert!(Chain::default().gt(json!(1)).execute(&json!("2")).is_err());
    }

    #[test]
    fn length_measures_chars_and_elements() {
        let chain = Chain::default().length(1, Some(5));
        assert!(chain.execute(&json!("abc")).is_ok());
        assert!(chain.execute(&json!([1, 2, 3])).is_ok());
        assert!(chain.execute(&json!("")).is_err());
        assert!(chain.execute(&json!("toolong")).is_err());
        assert!(chain.execute(&json!(123)).is_err());

        assert!(Chain::default().length(2, None).execute(&json!("ab")).is_ok());
    }

    #[test]
    fn starts_and_ends_with_cover_strings_and_arrays() {
        assert!(Chain::default().starts_with(json!("ab")).execute(&json!("abc")).is_ok());
        assert!(Chain::default().starts_with(json!("b")).execute(&json!("abc")).is_err());
        assert!(Chain::default().starts_with(json!(1)).execute(&json!([1, 2])).is_ok());
        assert!(Chain::default().ends_with(json!("bc")).execute(&json!("abc")).is_ok());
        assert!(Chain::default().ends_with(json!(2)).execute(&json!([1, 2])).is_ok());
        assert!(Chain::default().ends_with(json!(1)).execute(&json!([1, 2])).is_err());
    }

    #[test]
    fn contains_needs_every_needle() {
        let chain = Chain::default().contains(vec![json!("a"), json!("b")]);
        assert!(chain.execute(&json!("bca")).is_ok());
        assert!(chain.execute(&json!("ac")).is_err());

        let chain = Chain::default().contains(vec![json!(2)]);
        assert!(chain.execute(&json!([1, 2, 3])).is_ok());
        assert!(chain.execute(&json!([1, 3])).is_err());
    }

    #[test]
    fn contains_with_no_needles_fails() {
        assert!(Chain::default().contains(vec![]).execute(&json!("x")).is_err());
    }

    #[test]
    fn matches_tests_strings_against_the_regex() {
        let chain = Chain::default().matches(Regex::new("^ab+$").unwrap());
        assert!(chain.execute(&json!("abbb")).is_ok());
        assert!(chain.execute(&json!("ba")).is_err());
        assert!(chain.execute(&json!(1)).is_err());
    }

    #[test]
    fn case_rules_apply_to_strings_only() {
        assert!(Chain::default().lower_case().execute(&json!("abc 1")).is_ok());
        assert!(Chain::default().lower_case().execute(&json!("Abc")).is_err());
        assert!(Chain::default().upper_case().execute(&json!("ABC")).is_ok());
        assert!(Chain::default().upper_case().execute(&json!(1)).is_err());
    }

    #[test]
    fn json_rule_parses_strings() {
        assert!(Chain::default().json().execute(&json!("{\"a\": 1}")).is_ok());
        assert!(Chain::default().json().execute(&json!("not json")).is_err());
        assert!(Chain::default().json().execute(&json!(1)).is_err());
    }

    #[test]
    fn unique_checks_elements_and_member_values() {
        assert!(Chain::default().unique().execute(&json!([1, 2, 3])).is_ok());
        assert!(Chain::default().unique().execute(&json!([1, 2, 1])).is_err());
        assert!(Chain::default().unique().execute(&json!({"a": 1, "b": 2})).is_ok());
        assert!(Chain::default().unique().execute(&json!({"a": 1, "b": 1})).is_err());
    }

    #[test]
    fn sorted_requires_ascending_comparable_neighbors() {
        assert!(Chain::default().sorted().execute(&json!([1, 2, 2, 3])).is_ok());
        assert!(Chain::default().sorted().execute(&json!(["a", "b"])).is_ok());
        assert!(Chain::default().sorted().execute(&json!([2, 1])).is_err());
        assert!(Chain::default().sorted().execute(&json!([1, "a"])).is_err());
    }

    #[test]
    fn list_string_phrasing() {
        assert_eq!(list_string(&[], "or"), "nothing");
        assert_eq!(list_string(&[json!("a")], "or"), "a");
        assert_eq!(list_string(&[json!("a"), json!("b")], "or"), "a or b");
        assert_eq!(
            list_string(&[json!("a"), json!("b"), json!("c")], "and"),
            "a, b and c"
        );
    }
}
