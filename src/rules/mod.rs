//! The built-in rule catalog and its fluent selectors
//!
//! The catalog is an exchangeable consumer of the engine: every factory
//! returns a plain [`Rule`], and the fluent methods below do nothing but
//! funnel those rules through [`Chain::rule`]. A custom catalog plugs in the
//! same way, either with its own extension trait over `Chain` or through the
//! [`Registry`](crate::registry::Registry).

pub mod common;
pub mod composite;
pub mod pattern;
pub mod types;

use regex::Regex;
use serde_json::Value;

use crate::chain::Chain;
pub use pattern::{CardType, IpVersion};

/// Fluent selectors for the built-in catalog.
///
/// Each method constructs the corresponding rule, pushes it onto the selected
/// sequence, and returns the chain for further composition:
///
/// ```rust
/// use veracity::Chain;
/// use serde_json::json;
///
/// let username = Chain::new("Username").string().length(3, Some(20)).alpha_numeric();
/// assert!(username.execute(&json!("dylan86")).is_ok());
/// ```
impl Chain {
    /// Selects the `string` type rule.
    pub fn string(self) -> Self {
        self.rule(types::string())
    }

    /// Selects the `number` type rule.
    pub fn number(self) -> Self {
        self.rule(types::number())
    }

    /// Selects the `boolean` type rule.
    pub fn boolean(self) -> Self {
        self.rule(types::boolean())
    }

    /// Selects the `object` composite rule. See [`composite::object`].
    ///
    /// # Panics
    ///
    /// When a `/…/` field name is not a valid regex, or when negation is
    /// armed and `fields` is non-empty.
    pub fn object<K, I>(self, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Chain)>,
    {
        self.rule(composite::object(fields))
    }

    /// Selects the `array` composite rule. See [`composite::array`].
    ///
    /// # Panics
    ///
    /// When negation is armed and `element_tests` is non-empty.
    pub fn array<I: IntoIterator<Item = Chain>>(self, element_tests: I) -> Self {
        self.rule(composite::array(element_tests))
    }

    /// Selects the `try` control-flow rule. See [`composite::try_`].
    ///
    /// # Panics
    ///
    /// When negation is armed: control-flow rules cannot be inverted.
    pub fn try_<I: IntoIterator<Item = Chain>>(self, chains: I) -> Self {
        self.rule(composite::try_(chains))
    }

    /// Selects the `eval` control-flow rule. See [`composite::eval`].
    ///
    /// Select it multiple times to run several builder functions; every
    /// produced chain is merged unconditionally either way.
    ///
    /// # Panics
    ///
    /// When negation is armed: control-flow rules cannot be inverted.
    pub fn eval<F>(self, builder: F) -> Self
    where
        F: Fn(&Value) -> Option<Chain> + Send + Sync + 'static,
    {
        self.rule(composite::eval(builder))
    }

    /// Selects the always-failing `error` rule with a message template.
    pub fn error(self, template: impl Into<String>) -> Self {
        self.rule(common::error(template))
    }

    /// Selects the `equals` any-of rule.
    pub fn equals(self, allowed: Vec<Value>) -> Self {
        self.rule(common::equals(allowed))
    }

    /// Selects the `integer` rule.
    pub fn integer(self) -> Self {
        self.rule(common::integer())
    }

    /// Selects the `precision` rule.
    pub fn precision(self, max: u32) -> Self {
        self.rule(common::precision(max))
    }

    /// Selects the `divisible_by` rule.
    pub fn divisible_by(self, divisor: f64) -> Self {
        self.rule(common::divisible_by(divisor))
    }

    /// Selects the strict less-than rule.
    pub fn lt(self, limit: Value) -> Self {
        self.rule(common::lt(limit))
    }

    /// Selects the less-than-or-equal rule.
    pub fn lte(self, limit: Value) -> Self {
        self.rule(common::lte(limit))
    }

    /// Selects the strict greater-than rule.
    pub fn gt(self, limit: Value) -> Self {
        self.rule(common::gt(limit))
    }

    /// Selects the greater-than-or-equal rule.
    pub fn gte(self, limit: Value) -> Self {
        self.rule(common::gte(limit))
    }

    /// Selects the `length` rule.
    pub fn length(self, min: usize, max: Option<usize>) -> Self {
        self.rule(common::length(min, max))
    }

    /// Selects the `starts_with` rule.
    pub fn starts_with(self, find: Value) -> Self {
        self.rule(common::starts_with(find))
    }

    /// Selects the `ends_with` rule.
    pub fn ends_with(self, find: Value) -> Self {
        self.rule(common::ends_with(find))
    }

    /// Selects the `contains` rule.
    pub fn contains(self, needles: Vec<Value>) -> Self {
        self.rule(common::contains(needles))
    }

    /// Selects the `matches` regex rule.
    pub fn matches(self, regex: Regex) -> Self {
        self.rule(common::matches(regex))
    }

    /// Selects the `lower_case` rule.
    pub fn lower_case(self) -> Self {
        self.rule(common::lower_case())
    }

    /// Selects the `upper_case` rule.
    pub fn upper_case(self) -> Self {
        self.rule(common::upper_case())
    }

    /// Selects the `json` rule.
    pub fn json(self) -> Self {
        self.rule(common::json())
    }

    /// Selects the `empty` rule.
    pub fn empty(self) -> Self {
        self.rule(common::empty())
    }

    /// Selects the `unique` rule.
    pub fn unique(self) -> Self {
        self.rule(common::unique())
    }

    /// Selects the `sorted` rule.
    pub fn sorted(self) -> Self {
        self.rule(common::sorted())
    }

    /// Selects the `alpha` format rule.
    pub fn alpha(self) -> Self {
        self.rule(pattern::alpha())
    }

    /// Selects the `numeric` format rule.
    pub fn numeric(self) -> Self {
        self.rule(pattern::numeric())
    }

    /// Selects the `alpha_numeric` format rule.
    pub fn alpha_numeric(self) -> Self {
        self.rule(pattern::alpha_numeric())
    }

    /// Selects the `hex` format rule.
    pub fn hex(self) -> Self {
        self.rule(pattern::hex())
    }

    /// Selects the `hex_color` format rule.
    pub fn hex_color(self) -> Self {
        self.rule(pattern::hex_color())
    }

    /// Selects the `ascii` format rule.
    pub fn ascii(self) -> Self {
        self.rule(pattern::ascii())
    }

    /// Selects the `html` format rule.
    pub fn html(self) -> Self {
        self.rule(pattern::html())
    }

    /// Selects the `mongo_id` format rule.
    pub fn mongo_id(self) -> Self {
        self.rule(pattern::mongo_id())
    }

    /// Selects the `email` format rule.
    pub fn email(self) -> Self {
        self.rule(pattern::email())
    }

    /// Selects the `ip` format rule.
    pub fn ip(self, version: Option<IpVersion>) -> Self {
        self.rule(pattern::ip(version))
    }

    /// Selects the `phone_number` format rule.
    pub fn phone_number(self) -> Self {
        self.rule(pattern::phone_number())
    }

    /// Selects the `credit_card` format rule.
    pub fn credit_card(self, types: Vec<CardType>) -> Self {
        self.rule(pattern::credit_card(types))
    }
}
