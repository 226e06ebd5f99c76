//! The validation chain: fluent builder and execution engine
//!
//! A [`Chain`] accumulates an ordered sequence of selected rules through
//! fluent method calls, then executes them against a value, collecting every
//! failure into a per-call [`Aggregator`]. Chains are reusable: `execute` may
//! be called any number of times, each call starting from a fresh aggregator,
//! so a chain built once can be shared across threads and executed
//! concurrently.
//!
//! # Examples
//!
//! ```rust
//! use serde_json::json;
//! use veracity::Chain;
//!
//! let phones = Chain::new("Phones").array([Chain::new("Phone Number").string()]);
//!
//! assert!(phones.execute(&json!(["555555", "123456"])).is_ok());
//!
//! let failure = phones.execute(&json!(["555555", 1])).unwrap_err();
//! assert_eq!(failure.errors.at("1").unwrap()[0].rule, "string");
//! ```

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::aggregator::Aggregator;
use crate::errors::{
    ConstructionError, ErrorRecord, ValidationError, ValidationResult, REQUIRED_RULE,
    REQUIRED_TEMPLATE,
};
use crate::registry::Registry;
use crate::rule::Rule;

/// A buildable, reusable validator: label, required flag, annotations, and an
/// ordered rule sequence.
#[derive(Debug, Clone)]
pub struct Chain {
    label: String,
    required: bool,
    annotations: IndexMap<String, Value>,
    selected: Vec<Rule>,
    pending_not: bool,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new("")
    }
}

impl Chain {
    /// Creates a chain with a display label.
    ///
    /// The label substitutes `{PATH}` in rendered messages produced by this
    /// chain; it never becomes a structural path key. Pass `""` for an
    /// unlabeled chain, where messages fall back to the structural path.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            required: true,
            annotations: IndexMap::new(),
            selected: Vec::new(),
            pending_not: false,
        }
    }

    /// The chain's display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of selected rules.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether no rules have been selected yet.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Sets whether null input is itself a failure. Chains are required by
    /// default; `required(false)` is equivalent to [`Chain::optional`]. The
    /// later of the two setters wins.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Accepts null input without evaluating any rule.
    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Merges key/value pairs into the chain's annotations.
    ///
    /// Annotations are copied onto every error record this chain produces,
    /// applied at execution time, so they cover rules selected both before
    /// and after the call. Later calls override earlier ones on key collision.
    pub fn annotate<K, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        for (key, value) in entries {
            self.annotations.insert(key.into(), value);
        }
        self
    }

    /// Arms negation for the next selected rule.
    ///
    /// The next call that pushes a rule will invert its predicate and record
    /// failures under a `not.`-prefixed name.
    pub fn not(mut self) -> Self {
        self.pending_not = true;
        self
    }

    /// Pushes a rule onto the selected sequence.
    ///
    /// Every fluent catalog method funnels through here, so custom rules plug
    /// in the same way the built-in catalog does.
    ///
    /// # Panics
    ///
    /// When negation is armed and the rule cannot be inverted: control-flow
    /// rules (`try`, `eval`) and object/array rules carrying nested
    /// validators. Malformed validator definitions are programmer errors and
    /// fail fast at the call that misused the API.
    pub fn rule(mut self, rule: Rule) -> Self {
        let rule = if self.pending_not {
            self.pending_not = false;
            match rule.negate() {
                Ok(negated) => negated,
                Err(err) => panic!("{err}"),
            }
        } else {
            rule
        };
        self.selected.push(rule);
        self
    }

    /// Selects a rule by name through a registry.
    ///
    /// The dynamic counterpart of the fluent catalog methods. `"not."`-prefixed
    /// names resolve through the same negation rules, yielding
    /// [`ConstructionError::NotInvertible`] for control-flow rules.
    pub fn rule_named(
        self,
        registry: &Registry,
        name: &str,
        args: &[Value],
    ) -> Result<Self, ConstructionError> {
        let rule = registry.build(name, args)?;
        let mut chain = self;
        if chain.pending_not {
            chain.pending_not = false;
            return Ok(chain.push_built(rule.negate()?));
        }
        Ok(chain.push_built(rule))
    }

    fn push_built(mut self, rule: Rule) -> Self {
        self.selected.push(rule);
        self
    }

    /// Runs the selected rules against `value`.
    ///
    /// `Value::Null` stands in for both null and absent input: a required
    /// chain records exactly one `required` failure at its own path, an
    /// optional chain succeeds immediately without evaluating any rule.
    /// Otherwise rules run in selection order; each predicate returning
    /// non-`true` files one record built from the rule's identity, the failing
    /// value, and the chain's label and annotations. Composite rules append
    /// nested failures through the shared aggregator as they evaluate.
    ///
    /// Always returns, never panics: data-validation failures come back as
    /// the `Err` payload.
    pub fn execute(&self, value: &Value) -> ValidationResult {
        let mut errors = Aggregator::for_chain(self.annotations.clone());
        trace!(label = %self.label, rules = self.selected.len(), "executing chain");

        if value.is_null() {
            if self.required {
                errors.append(self.failure(REQUIRED_RULE, None, REQUIRED_TEMPLATE, Value::Null), "");
            }
        } else {
            for rule in &self.selected {
                let passed = rule.run(value, &mut errors);
                if !passed {
                    errors.append(
                        self.failure(
                            rule.name(),
                            rule.args().map(<[Value]>::to_vec),
                            rule.template(),
                            value.clone(),
                        ),
                        "",
                    );
                }
            }
        }

        match errors.finish() {
            None => Ok(()),
            Some(paths) => {
                debug!(label = %self.label, paths = paths.len(), "chain failed");
                Err(ValidationError::from_paths(paths))
            }
        }
    }

    /// Concatenates chains into a new one.
    ///
    /// The selected-rule sequence is the concatenation of the inputs'
    /// sequences in argument order. The label is the first non-empty label
    /// found left to right, so independently defined partial validators share
    /// one path for messages. The result is required with no annotations.
    pub fn concat<I: IntoIterator<Item = Chain>>(chains: I) -> Chain {
        let mut merged = Chain::default();
        for chain in chains {
            if merged.label.is_empty() && !chain.label.is_empty() {
                merged.label = chain.label;
            }
            merged.selected.extend(chain.selected);
        }
        merged
    }

    fn failure(
        &self,
        rule: &str,
        args: Option<Vec<Value>>,
        template: &str,
        value: Value,
    ) -> ErrorRecord {
        ErrorRecord::new(rule, value)
            .with_args(args)
            .with_label(self.label.clone())
            .with_template(template)
            .with_annotations(self.annotations.clone())
    }
}
