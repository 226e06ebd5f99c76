//! Type-check rules
//!
//! One rule per JSON-representable primitive type. Object and array type
//! checks live in [`composite`](crate::rules::composite) because they also
//! drive nested validation.

use crate::predicates;
use crate::rule::Rule;

/// The value must be a string.
pub fn string() -> Rule {
    Rule::scalar("string", "{PATH} should be a string", |value, _| {
        predicates::is_string(value)
    })
}

/// The value must be a number.
pub fn number() -> Rule {
    Rule::scalar("number", "{PATH} should be a number", |value, _| {
        predicates::is_number(value)
    })
}

/// The value must be a boolean.
pub fn boolean() -> Rule {
    Rule::scalar("boolean", "{PATH} should be a boolean", |value, _| {
        predicates::is_boolean(value)
    })
}
