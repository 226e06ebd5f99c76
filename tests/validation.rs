//! End-to-end scenarios exercising nested schemas, arrays, alternatives,
//! negation, and registry-driven construction together.

use pretty_assertions::assert_eq;
use serde_json::json;
use veracity::{Chain, Registry, Rule, RuleKind, Value};

fn user_validator() -> Chain {
    Chain::new("User").object([
        (
            "name",
            Chain::new("Name").object([
                ("first", Chain::new("First Name").string().length(1, Some(64))),
                ("last", Chain::new("Last Name").string().optional()),
            ]),
        ),
        (
            "phones",
            Chain::new("Phones")
                .array([Chain::new("Phone Number").string().phone_number()])
                .optional(),
        ),
        ("email", Chain::new("Email").email()),
    ])
}

#[test]
fn accepts_a_fully_valid_document() {
    let valid = json!({
        "name": { "first": "Ada", "last": "Lovelace" },
        "phones": ["(555) 123-4567"],
        "email": "ada@example.com"
    });
    assert!(user_validator().execute(&valid).is_ok());
}

#[test]
fn nested_failures_land_at_dotted_paths() {
    let failure = user_validator()
        .execute(&json!({
            "name": { "first": 123 },
            "phones": ["(555) 123-4567", 42],
            "email": "ada@example.com",
            "nickname": "ada"
        }))
        .unwrap_err();

    let errors = failure.errors.as_by_path().unwrap();
    assert_eq!(errors["name.first"][0].rule, "string");
    assert_eq!(errors["phones.1"][0].rule, "string");
    assert_eq!(errors["nickname"][0].rule, "extra_field");
    assert!(!errors.contains_key("name.last"));
}

#[test]
fn messages_render_labels_and_structural_paths() {
    let failure = user_validator()
        .execute(&json!({
            "name": {},
            "email": "ada@example.com",
            "nickname": "ada"
        }))
        .unwrap_err();

    let messages = failure.messages();
    assert!(messages.contains(&"First Name is a required field".to_string()));
    assert!(messages.contains(&"nickname is not an allowed field".to_string()));
}

#[test]
fn payload_serializes_for_api_responses() {
    let failure = user_validator()
        .execute(&json!({
            "name": { "first": 7 },
            "email": "ada@example.com"
        }))
        .unwrap_err();

    let encoded = serde_json::to_value(&failure).unwrap();
    assert_eq!(
        encoded,
        json!({
            "errors": {
                "name.first": [{
                    "rule": "string",
                    "value": 7
                }, {
                    "rule": "length",
                    "args": [1, 64],
                    "value": 7
                }]
            }
        })
    );
}

#[test]
fn try_accepts_any_alternative_and_reports_all_on_failure() {
    let id = Chain::new("Id").try_([
        Chain::default().string().mongo_id(),
        Chain::default().number().integer(),
    ]);

    assert!(id.execute(&json!(42)).is_ok());
    assert!(id.execute(&json!("507f1f77bcf86cd799439011")).is_ok());

    let failure = id.execute(&json!(true)).unwrap_err();
    let rules: Vec<&str> = failure
        .errors
        .as_flat()
        .unwrap()
        .iter()
        .map(|record| record.rule.as_str())
        .collect();
    assert_eq!(rules, vec!["string", "mongo_id", "number", "integer"]);
}

#[test]
fn eval_builds_chains_from_the_value_under_test() {
    let flexible = Chain::new("Payload").eval(|value| {
        if value.is_string() {
            Some(Chain::new("Payload").json())
        } else {
            Some(Chain::new("Payload").object::<&str, _>([]))
        }
    });

    assert!(flexible.execute(&json!("{\"ok\": true}")).is_ok());
    assert!(flexible.execute(&json!({"ok": true})).is_ok());
    assert!(flexible.execute(&json!("not json")).is_err());
    assert!(flexible.execute(&json!(5)).is_err());
}

#[test]
fn negation_and_concat_compose_with_the_catalog() {
    let base = Chain::new("Code").string();
    let extra = Chain::default().not().numeric().length(4, Some(4));
    let merged = Chain::concat([base, extra]);

    assert_eq!(merged.label(), "Code");
    assert!(merged.execute(&json!("ab12")).is_ok());

    let failure = merged.execute(&json!("1234")).unwrap_err();
    assert_eq!(failure.errors.as_flat().unwrap()[0].rule, "not.numeric");
}

#[test]
fn registry_builds_the_same_validators_by_name() {
    let registry = Registry::builtin();
    let chain = Chain::new("Email")
        .rule_named(&registry, "string", &[])
        .unwrap()
        .rule_named(&registry, "email", &[])
        .unwrap();

    assert!(chain.execute(&json!("ada@example.com")).is_ok());
    assert!(chain.execute(&json!("nope")).is_err());
}

#[test]
fn custom_registry_rules_participate_in_negation() {
    let mut registry = Registry::builtin();
    registry.register("uuid_like", RuleKind::Scalar, |_| {
        Ok(Rule::scalar(
            "uuid_like",
            "{PATH} should look like a uuid",
            |value, _| {
                value
                    .as_str()
                    .is_some_and(|s| s.len() == 36 && s.chars().filter(|&c| c == '-').count() == 4)
            },
        ))
    });

    let chain = Chain::default()
        .rule_named(&registry, "not.uuid_like", &[])
        .unwrap();
    assert!(chain.execute(&json!("plain text")).is_ok());
    assert!(chain
        .execute(&json!("123e4567-e89b-12d3-a456-426614174000"))
        .is_err());
}

#[test]
fn chains_validate_concurrently_from_shared_state() {
    use std::sync::Arc;
    use std::thread;

    let validator = Arc::new(user_validator());
    let mut handles = Vec::new();
    for i in 0..4 {
        let validator = Arc::clone(&validator);
        handles.push(thread::spawn(move || {
            let doc = json!({
                "name": { "first": format!("user-{i}") },
                "email": format!("user-{i}@example.com")
            });
            validator.execute(&doc).is_ok()
        }));
    }
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn null_and_absent_fields_are_equivalent() {
    let validator = Chain::default().object([
        ("a", Chain::new("A").string()),
        ("b", Chain::new("B").string().optional()),
    ]);

    let absent = validator.execute(&json!({})).unwrap_err();
    let explicit = validator.execute(&json!({"a": Value::Null, "b": Value::Null})).unwrap_err();
    assert_eq!(absent.errors, explicit.errors);
    assert_eq!(absent.errors.at("a").unwrap()[0].rule, "required");
    assert!(absent.errors.at("b").is_none());
}
