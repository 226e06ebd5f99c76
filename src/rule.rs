//! Rule records: named, parameterized predicates with failure metadata
//!
//! A [`Rule`] is immutable once pushed onto a chain. Its predicate receives
//! the value under test and the live [`Aggregator`] as an explicit parameter,
//! so composite rules (object/array/try/eval) can append nested errors as a
//! side effect of evaluation while still reporting their own pass/fail.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::aggregator::Aggregator;
use crate::errors::ConstructionError;

/// Predicate evaluated against the value under test.
///
/// Returning anything but `true` counts as a failure of this rule at the
/// chain's own path. Fallible work inside a predicate is expressed by
/// returning `false`; there is no exception channel at this boundary.
pub type Predicate = Arc<dyn Fn(&Value, &mut Aggregator) -> bool + Send + Sync>;

/// Classification deciding whether a rule may be negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Plain predicate; freely invertible.
    Scalar,
    /// Object/array rule; invertible only while it carries no nested
    /// validators, since "not an object matching schema X" does not invert.
    Composite,
    /// `try`/`eval`; inversion has no meaning and is always rejected.
    ControlFlow,
}

/// A named, parameterized predicate plus failure-message metadata.
#[derive(Clone)]
pub struct Rule {
    name: String,
    args: Option<Vec<Value>>,
    kind: RuleKind,
    negated: bool,
    has_nested: bool,
    template: String,
    predicate: Predicate,
}

impl Rule {
    /// Creates a plain scalar rule.
    pub fn scalar(
        name: impl Into<String>,
        template: impl Into<String>,
        predicate: impl Fn(&Value, &mut Aggregator) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            args: None,
            kind: RuleKind::Scalar,
            negated: false,
            has_nested: false,
            template: template.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Creates a composite rule. `has_nested` records whether nested
    /// validators were supplied, which blocks later negation.
    pub fn composite(
        name: impl Into<String>,
        has_nested: bool,
        template: impl Into<String>,
        predicate: impl Fn(&Value, &mut Aggregator) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            args: None,
            kind: RuleKind::Composite,
            negated: false,
            has_nested,
            template: template.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Creates a control-flow rule (`try`/`eval`).
    pub fn control_flow(
        name: impl Into<String>,
        template: impl Into<String>,
        predicate: impl Fn(&Value, &mut Aggregator) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            args: None,
            kind: RuleKind::ControlFlow,
            negated: false,
            has_nested: true,
            template: template.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Attaches the raw selection-time arguments, kept for error records.
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = Some(args);
        self
    }

    /// Rule name, `not.`-prefixed when negated.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw selection-time arguments, if any.
    pub fn args(&self) -> Option<&[Value]> {
        self.args.as_deref()
    }

    /// The rule's classification.
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Whether this rule was produced by negation.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Message template rendered into failure records.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Evaluates the predicate against `value` with the live aggregator.
    pub fn run(&self, value: &Value, errors: &mut Aggregator) -> bool {
        (self.predicate)(value, errors)
    }

    /// Produces the negated counterpart of this rule.
    ///
    /// Control-flow rules and composites carrying nested validators are
    /// rejected at construction time; everything else gets its boolean result
    /// inverted, a `not.`-prefixed name, and a negated message template.
    pub fn negate(self) -> Result<Self, ConstructionError> {
        match self.kind {
            RuleKind::ControlFlow => Err(ConstructionError::NotInvertible(self.name)),
            RuleKind::Composite if self.has_nested => {
                Err(ConstructionError::NegatedComposite(self.name))
            }
            _ => {
                let inner = Arc::clone(&self.predicate);
                Ok(Self {
                    template: format!("{{PATH}} should not pass rule `{}`", self.name),
                    name: format!("not.{}", self.name),
                    negated: true,
                    predicate: Arc::new(move |value, errors| !inner(value, errors)),
                    ..self
                })
            }
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("kind", &self.kind)
            .field("negated", &self.negated)
            .field("template", &self.template)
            .field("predicate", &"<predicate>")
            .finish()
    }
}
