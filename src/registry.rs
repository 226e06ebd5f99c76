//! Rule registry: name-driven rule construction and the extension surface
//!
//! The registry is an explicit value built at startup and passed wherever
//! rules are selected by name (configuration-driven validators, for
//! instance), replacing the original design's process-global mutable rule
//! table. Lookups take `&self`, so a registry shared behind an `Arc` is safe
//! to use from many threads once populated; mutating it after startup is a
//! documented precondition, not an enforced lock.
//!
//! Negated rules are addressed as `not.<name>`. The invertibility of a rule
//! is decided by its [`RuleKind`] at registration time: control-flow rules
//! resolve to "not available" and argument-carrying composites are rejected
//! when the rule is built.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use veracity::{Chain, Registry, Rule, RuleKind};
//!
//! let mut registry = Registry::builtin();
//! registry.register("even", RuleKind::Scalar, |args| {
//!     if !args.is_empty() {
//!         return Err(veracity::ConstructionError::BadArguments {
//!             rule: "even".into(),
//!             reason: "expected no arguments".into(),
//!         });
//!     }
//!     Ok(Rule::scalar("even", "{PATH} should be even", |value, _| {
//!         value.as_i64().is_some_and(|n| n % 2 == 0)
//!     }))
//! });
//!
//! let chain = Chain::new("Count")
//!     .rule_named(&registry, "even", &[])
//!     .unwrap();
//! assert!(chain.execute(&json!(4)).is_ok());
//! assert!(chain.execute(&json!(3)).is_err());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::errors::ConstructionError;
use crate::rule::{Rule, RuleKind};
use crate::rules::{common, composite, pattern, types, CardType, IpVersion};

/// Factory building a rule from raw JSON arguments.
pub type RuleFactory = Arc<dyn Fn(&[Value]) -> Result<Rule, ConstructionError> + Send + Sync>;

struct Entry {
    kind: RuleKind,
    factory: RuleFactory,
}

/// Mapping from rule name to its kind and factory.
pub struct Registry {
    entries: HashMap<String, Entry>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Creates a registry pre-populated with the built-in catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        register_builtin(&mut registry);
        registry
    }

    /// Registers a rule factory under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: RuleKind,
        factory: impl Fn(&[Value]) -> Result<Rule, ConstructionError> + Send + Sync + 'static,
    ) {
        let name = name.into();
        debug!(rule = %name, ?kind, "registering rule");
        self.entries.insert(name, Entry { kind, factory: Arc::new(factory) });
    }

    /// Registers every `(name, kind, factory)` entry.
    pub fn extend<N, I>(&mut self, entries: I)
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, RuleKind, RuleFactory)>,
    {
        for (name, kind, factory) in entries {
            self.entries.insert(name.into(), Entry { kind, factory });
        }
    }

    /// Whether `name` resolves to a rule. `not.`-prefixed names resolve only
    /// when the base rule is invertible.
    pub fn contains(&self, name: &str) -> bool {
        match name.strip_prefix("not.") {
            Some(base) => self
                .entries
                .get(base)
                .is_some_and(|entry| entry.kind != RuleKind::ControlFlow),
            None => self.entries.contains_key(name),
        }
    }

    /// Iterates over registered (non-negated) rule names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Builds the rule registered under `name` with the given arguments.
    ///
    /// `not.<name>` builds the base rule and negates it; control-flow base
    /// rules are rejected with [`ConstructionError::NotInvertible`] before
    /// their factory runs.
    pub fn build(&self, name: &str, args: &[Value]) -> Result<Rule, ConstructionError> {
        if let Some(base) = name.strip_prefix("not.") {
            let entry = self
                .entries
                .get(base)
                .ok_or_else(|| ConstructionError::UnknownRule(base.to_string()))?;
            if entry.kind == RuleKind::ControlFlow {
                return Err(ConstructionError::NotInvertible(base.to_string()));
            }
            return (entry.factory)(args)?.negate();
        }

        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ConstructionError::UnknownRule(name.to_string()))?;
        (entry.factory)(args)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.entries.len())
            .finish()
    }
}

fn bad_args(rule: &str, reason: impl Into<String>) -> ConstructionError {
    ConstructionError::BadArguments { rule: rule.to_string(), reason: reason.into() }
}

fn no_args(rule: &'static str, args: &[Value]) -> Result<(), ConstructionError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(bad_args(rule, "expected no arguments"))
    }
}

fn one_arg<'a>(rule: &'static str, args: &'a [Value]) -> Result<&'a Value, ConstructionError> {
    match args {
        [arg] => Ok(arg),
        _ => Err(bad_args(rule, format!("expected 1 argument, got {}", args.len()))),
    }
}

fn str_arg(rule: &'static str, arg: &Value) -> Result<String, ConstructionError> {
    arg.as_str()
        .map(str::to_string)
        .ok_or_else(|| bad_args(rule, "expected a string argument"))
}

fn num_arg(rule: &'static str, arg: &Value) -> Result<f64, ConstructionError> {
    arg.as_f64()
        .ok_or_else(|| bad_args(rule, "expected a numeric argument"))
}

fn usize_arg(rule: &'static str, arg: &Value) -> Result<usize, ConstructionError> {
    arg.as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| bad_args(rule, "expected a non-negative integer argument"))
}

/// Registers a zero-argument rule factory.
fn simple(
    registry: &mut Registry,
    name: &'static str,
    kind: RuleKind,
    build: impl Fn() -> Rule + Send + Sync + 'static,
) {
    registry.register(name, kind, move |args| {
        no_args(name, args)?;
        Ok(build())
    });
}

fn register_builtin(registry: &mut Registry) {
    simple(registry, "string", RuleKind::Scalar, types::string);
    simple(registry, "number", RuleKind::Scalar, types::number);
    simple(registry, "boolean", RuleKind::Scalar, types::boolean);
    simple(registry, "integer", RuleKind::Scalar, common::integer);
    simple(registry, "lower_case", RuleKind::Scalar, common::lower_case);
    simple(registry, "upper_case", RuleKind::Scalar, common::upper_case);
    simple(registry, "json", RuleKind::Scalar, common::json);
    simple(registry, "empty", RuleKind::Scalar, common::empty);
    simple(registry, "unique", RuleKind::Scalar, common::unique);
    simple(registry, "sorted", RuleKind::Scalar, common::sorted);
    simple(registry, "alpha", RuleKind::Scalar, pattern::alpha);
    simple(registry, "numeric", RuleKind::Scalar, pattern::numeric);
    simple(registry, "alpha_numeric", RuleKind::Scalar, pattern::alpha_numeric);
    simple(registry, "hex", RuleKind::Scalar, pattern::hex);
    simple(registry, "hex_color", RuleKind::Scalar, pattern::hex_color);
    simple(registry, "ascii", RuleKind::Scalar, pattern::ascii);
    simple(registry, "html", RuleKind::Scalar, pattern::html);
    simple(registry, "mongo_id", RuleKind::Scalar, pattern::mongo_id);
    simple(registry, "email", RuleKind::Scalar, pattern::email);
    simple(registry, "phone_number", RuleKind::Scalar, pattern::phone_number);

    registry.register("error", RuleKind::Scalar, |args| {
        let template = str_arg("error", one_arg("error", args)?)?;
        Ok(common::error(template))
    });
    registry.register("equals", RuleKind::Scalar, |args| Ok(common::equals(args.to_vec())));
    registry.register("contains", RuleKind::Scalar, |args| Ok(common::contains(args.to_vec())));
    registry.register("precision", RuleKind::Scalar, |args| {
        let max = usize_arg("precision", one_arg("precision", args)?)?;
        Ok(common::precision(max as u32))
    });
    registry.register("divisible_by", RuleKind::Scalar, |args| {
        let divisor = num_arg("divisible_by", one_arg("divisible_by", args)?)?;
        Ok(common::divisible_by(divisor))
    });
    registry.register("lt", RuleKind::Scalar, |args| {
        Ok(common::lt(one_arg("lt", args)?.clone()))
    });
    registry.register("lte", RuleKind::Scalar, |args| {
        Ok(common::lte(one_arg("lte", args)?.clone()))
    });
    registry.register("gt", RuleKind::Scalar, |args| {
        Ok(common::gt(one_arg("gt", args)?.clone()))
    });
    registry.register("gte", RuleKind::Scalar, |args| {
        Ok(common::gte(one_arg("gte", args)?.clone()))
    });
    registry.register("length", RuleKind::Scalar, |args| match args {
        [min] => Ok(common::length(usize_arg("length", min)?, None)),
        [min, max] => Ok(common::length(
            usize_arg("length", min)?,
            Some(usize_arg("length", max)?),
        )),
        _ => Err(bad_args("length", format!("expected 1 or 2 arguments, got {}", args.len()))),
    });
    registry.register("starts_with", RuleKind::Scalar, |args| {
        Ok(common::starts_with(one_arg("starts_with", args)?.clone()))
    });
    registry.register("ends_with", RuleKind::Scalar, |args| {
        Ok(common::ends_with(one_arg("ends_with", args)?.clone()))
    });
    registry.register("matches", RuleKind::Scalar, |args| {
        let source = str_arg("matches", one_arg("matches", args)?)?;
        let regex = regex::Regex::new(&source)
            .map_err(|err| bad_args("matches", err.to_string()))?;
        Ok(common::matches(regex))
    });
    registry.register("ip", RuleKind::Scalar, |args| {
        let version = match args {
            [] => None,
            [arg] => match num_arg("ip", arg)? as i64 {
                4 => Some(IpVersion::V4),
                6 => Some(IpVersion::V6),
                other => return Err(bad_args("ip", format!("unknown ip version {other}"))),
            },
            _ => return Err(bad_args("ip", "expected at most 1 argument")),
        };
        Ok(pattern::ip(version))
    });
    registry.register("credit_card", RuleKind::Scalar, |args| {
        let mut cards = Vec::with_capacity(args.len());
        for arg in args {
            let name = str_arg("credit_card", arg)?;
            let card = CardType::parse(&name)
                .ok_or_else(|| bad_args("credit_card", format!("unknown card type `{name}`")))?;
            cards.push(card);
        }
        Ok(pattern::credit_card(cards))
    });

    // Bare type checks only: nested validators cannot be expressed as JSON
    // arguments, so registry-built object/array rules carry no field or
    // element tests and stay invertible.
    registry.register("object", RuleKind::Composite, |args| {
        no_args("object", args)?;
        Ok(composite::object::<String, _>([]))
    });
    registry.register("array", RuleKind::Composite, |args| {
        no_args("array", args)?;
        Ok(composite::array([]))
    });

    registry.register("try", RuleKind::ControlFlow, |_| {
        Err(bad_args("try", "requires nested chains; use the fluent API"))
    });
    registry.register("eval", RuleKind::ControlFlow, |_| {
        Err(bad_args("eval", "requires nested chains; use the fluent API"))
    });
}
