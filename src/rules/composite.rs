//! Composite rules: object, array, try, eval
//!
//! These rules invoke nested chains during their own evaluation and merge the
//! sub-results into the active aggregator at computed sub-paths. The recursive
//! composition here is what turns flat rule failures into dotted paths like
//! `phones.1.number`.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::chain::Chain;
use crate::errors::{ErrorRecord, EXTRA_FIELD_RULE, EXTRA_FIELD_TEMPLATE};
use crate::rule::Rule;

/// Builds the `object` rule from `(field name, chain)` pairs.
///
/// Duplicate field names accumulate rather than overwrite, so independently
/// declared field groups compose. A name wrapped in `/…/` is compiled as a
/// regex pattern: its chains run against every input key matching the
/// pattern, in addition to (not instead of) literally declared fields.
///
/// At evaluation time the input must be an object; that type check stands on
/// its own even with an empty field map. Declared fields run their chains
/// against the member value (absent members validate as null, engaging the
/// nested chain's required handling). Input keys that are neither literally
/// declared nor pattern-matched each get one `extra_field` record: objects
/// are a closed schema by default. Extra-field records carry the owning
/// chain's annotations; its label stays off them, since the label names the
/// chain's own value while these records sit at the offending key's path.
///
/// # Panics
///
/// When a `/…/` field name is not a valid regex. Validator definitions are
/// written by the programmer, so this fails fast like the other construction
/// errors.
pub fn object<K, I>(fields: I) -> Rule
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Chain)>,
{
    let mut literal: IndexMap<String, Vec<Chain>> = IndexMap::new();
    let mut patterns: Vec<(Regex, Vec<Chain>)> = Vec::new();

    for (key, chain) in fields {
        let key = key.into();
        match pattern_source(&key) {
            Some(source) => {
                let regex = match Regex::new(source) {
                    Ok(regex) => regex,
                    Err(err) => panic!("invalid field pattern `{key}`: {err}"),
                };
                patterns.push((regex, vec![chain]));
            }
            None => literal.entry(key).or_default().push(chain),
        }
    }

    let has_nested = !literal.is_empty() || !patterns.is_empty();

    Rule::composite("object", has_nested, "{PATH} should be an object", move |value, errors| {
        let Some(map) = value.as_object() else {
            return false;
        };

        if has_nested {
            let annotations = errors.annotations().clone();

            for (field, chains) in &literal {
                let member = map.get(field).cloned().unwrap_or(Value::Null);
                for chain in chains {
                    errors.merge(chain.execute(&member), field);
                }
            }

            for (key, member) in map {
                let mut declared = literal.contains_key(key);
                for (regex, chains) in &patterns {
                    if regex.is_match(key) {
                        declared = true;
                        for chain in chains {
                            errors.merge(chain.execute(member), key);
                        }
                    }
                }
                if !declared {
                    errors.append(
                        ErrorRecord::new(EXTRA_FIELD_RULE, member.clone())
                            .with_template(EXTRA_FIELD_TEMPLATE)
                            .with_annotations(annotations.clone()),
                        key,
                    );
                }
            }
        }

        true
    })
}

fn pattern_source(key: &str) -> Option<&str> {
    if key.len() >= 2 && key.starts_with('/') && key.ends_with('/') {
        Some(&key[1..key.len() - 1])
    } else {
        None
    }
}

/// Builds the `array` rule from element tests.
///
/// The input must be an array. Every element test runs against every element,
/// with sub-results merged at path = decimal index. Arrays are open-ended:
/// there is no extra-element concept, unlike objects.
pub fn array<I: IntoIterator<Item = Chain>>(element_tests: I) -> Rule {
    let tests: Vec<Chain> = element_tests.into_iter().collect();
    let has_nested = !tests.is_empty();

    Rule::composite("array", has_nested, "{PATH} should be an array", move |value, errors| {
        let Some(items) = value.as_array() else {
            return false;
        };

        for (index, item) in items.iter().enumerate() {
            for test in &tests {
                errors.merge(test.execute(item), &index.to_string());
            }
        }

        true
    })
}

/// Builds the `try` rule: passes if any chain succeeds.
///
/// Short-circuits on the first success. Only when every chain fails does it
/// merge *all* of their failure payloads at the current path, so a failed
/// `try` surfaces every branch's errors rather than an arbitrary one. The
/// rule itself always reports pass; failures come only from the merged
/// branch errors.
pub fn try_<I: IntoIterator<Item = Chain>>(chains: I) -> Rule {
    let chains: Vec<Chain> = chains.into_iter().collect();

    Rule::control_flow("try", "{PATH} could not run a test", move |value, errors| {
        if chains.iter().any(|chain| chain.execute(value).is_ok()) {
            return true;
        }
        for chain in &chains {
            errors.merge(chain.execute(value), "");
        }
        true
    })
}

/// Builds the `eval` rule: defers chain construction until the value is known.
///
/// The function receives the value under test and returns the chain to run
/// against it, or `None` for nothing. Unlike `try`, every produced chain's
/// result is merged unconditionally, and `eval` never fails on its own
/// account; only nested merged errors can produce a failure.
pub fn eval<F>(builder: F) -> Rule
where
    F: Fn(&Value) -> Option<Chain> + Send + Sync + 'static,
{
    Rule::control_flow("eval", "{PATH} could not run a test", move |value, errors| {
        if let Some(chain) = builder(value) {
            errors.merge(chain.execute(value), "");
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn object_requires_object_even_without_fields() {
        let chain = Chain::default().object::<&str, _>([]);
        assert!(chain.execute(&json!({})).is_ok());
        assert!(chain.execute(&json!("scalar")).is_err());
    }

    #[test]
    fn nested_failures_surface_at_dotted_paths() {
        let chain = Chain::default().object([(
            "a",
            Chain::default().object([("b", Chain::default().string())]),
        )]);
        let failure = chain.execute(&json!({"a": {"b": 1}})).unwrap_err();
        let paths = failure.errors.as_by_path().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths["a.b"][0].rule, "string");
    }

    #[test]
    fn undeclared_fields_are_extra() {
        let chain = Chain::default().object([("x", Chain::default().string())]);
        let failure = chain.execute(&json!({"x": "ok", "y": 1})).unwrap_err();
        let paths = failure.errors.as_by_path().unwrap();
        assert!(paths.get("x").is_none());
        assert_eq!(paths["y"][0].rule, "extra_field");
        assert_eq!(paths["y"][0].value, json!(1));
    }

    #[test]
    fn extra_field_records_carry_chain_annotations() {
        let chain = Chain::new("Doc")
            .annotate([("source", json!("form"))])
            .object([("x", Chain::default().string())]);
        let failure = chain.execute(&json!({"x": "ok", "y": 1})).unwrap_err();
        let record = &failure.errors.as_by_path().unwrap()["y"][0];
        assert_eq!(record.rule, "extra_field");
        assert_eq!(record.annotations["source"], json!("form"));
        // the label names the chain's own value, not the extra key
        assert_eq!(record.label(), "");
        assert_eq!(record.message("y"), "y is not an allowed field");
    }

    #[test]
    fn absent_declared_field_fails_as_required() {
        let chain = Chain::default().object([("name", Chain::default().string())]);
        let failure = chain.execute(&json!({})).unwrap_err();
        let paths = failure.errors.as_by_path().unwrap();
        assert_eq!(paths["name"][0].rule, "required");
    }

    #[test]
    fn absent_optional_field_passes() {
        let chain = Chain::default().object([("nick", Chain::default().optional().string())]);
        assert!(chain.execute(&json!({})).is_ok());
    }

    #[test]
    fn duplicate_field_declarations_accumulate() {
        let chain = Chain::default().object([
            ("v", Chain::default().string()),
            ("v", Chain::default().length(3, None)),
        ]);
        let failure = chain.execute(&json!({"v": 1})).unwrap_err();
        let records = &failure.errors.as_by_path().unwrap()["v"];
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rule, "string");
        assert_eq!(records[1].rule, "length");
    }

    #[test]
    fn pattern_fields_match_input_keys() {
        let chain = Chain::default().object([("/^x_/", Chain::default().number())]);
        assert!(chain.execute(&json!({"x_a": 1, "x_b": 2})).is_ok());

        let failure = chain.execute(&json!({"x_a": "nope", "other": 1})).unwrap_err();
        let paths = failure.errors.as_by_path().unwrap();
        assert_eq!(paths["x_a"][0].rule, "number");
        assert_eq!(paths["other"][0].rule, "extra_field");
    }

    #[test]
    fn pattern_fields_run_in_addition_to_literal_fields() {
        // both the literal chain and the matching pattern chain run on `xa`
        let chain = Chain::default().object([
            ("xa", Chain::default().string()),
            ("/^x/", Chain::default().length(2, None)),
        ]);
        let failure = chain.execute(&json!({"xa": 1})).unwrap_err();
        let records = &failure.errors.as_by_path().unwrap()["xa"];
        assert_eq!(records.len(), 2);
    }

    #[test]
    #[should_panic(expected = "invalid field pattern")]
    fn invalid_pattern_panics_at_construction() {
        let _ = object([("/([/", Chain::default().string())]);
    }

    #[test]
    fn array_indexes_failures_by_position() {
        let chain = Chain::new("Phones").array([Chain::new("Phone Number").string()]);
        assert!(chain.execute(&json!(["555555", "123456"])).is_ok());

        let failure = chain.execute(&json!(["555555", 1])).unwrap_err();
        let paths = failure.errors.as_by_path().unwrap();
        assert_eq!(paths.len(), 1);
        let records = &paths["1"];
        assert_eq!(records[0].rule, "string");
        assert_eq!(records[0].value, json!(1));
        assert_eq!(records[0].message("1"), "Phone Number should be a string");
    }

    #[test]
    fn array_without_tests_is_a_type_check() {
        let chain = Chain::default().array([]);
        assert!(chain.execute(&json!([1, "mixed", null])).is_ok());
        assert!(chain.execute(&json!({"length": 2})).is_err());
    }

    #[test]
    fn try_passes_when_any_branch_passes() {
        let chain = Chain::default().try_([
            Chain::default().string(),
            Chain::default().number(),
        ]);
        assert!(chain.execute(&json!("text")).is_ok());
        assert!(chain.execute(&json!(42)).is_ok());
    }

    #[test]
    fn try_merges_every_branch_on_total_failure() {
        let chain = Chain::default().try_([
            Chain::default().string(),
            Chain::default().number(),
        ]);
        let failure = chain.execute(&json!(true)).unwrap_err();
        let records = failure.errors.as_flat().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rule, "string");
        assert_eq!(records[1].rule, "number");
    }

    #[test]
    fn try_with_no_branches_passes() {
        assert!(Chain::default().try_([]).execute(&json!(1)).is_ok());
    }

    #[test]
    fn eval_builds_chains_from_the_value() {
        // Data-dependent validation: the declared type field decides the
        // shape of the payload field.
        let chain = Chain::default().eval(|value| {
            let kind = value.get("kind")?.as_str()?;
            match kind {
                "text" => Some(Chain::default().object([
                    ("kind", Chain::default().string()),
                    ("body", Chain::default().string()),
                ])),
                _ => None,
            }
        });

        assert!(chain.execute(&json!({"kind": "text", "body": "hi"})).is_ok());
        assert!(chain.execute(&json!({"kind": "binary"})).is_ok());

        let failure = chain.execute(&json!({"kind": "text", "body": 7})).unwrap_err();
        assert_eq!(failure.errors.at("body").unwrap()[0].rule, "string");
    }

    #[test]
    fn eval_merges_all_chains_without_short_circuit() {
        let chain = Chain::default()
            .eval(|_| Some(Chain::default().string()))
            .eval(|_| Some(Chain::default().length(3, None)));
        let failure = chain.execute(&json!(1)).unwrap_err();
        assert_eq!(failure.errors.as_flat().unwrap().len(), 2);
    }
}
