//! Error records, failure payloads, and construction errors
//!
//! Data-validation failures are values, never panics: [`Chain::execute`]
//! returns a [`ValidationError`] payload describing every failed rule, keyed
//! by the structural path at which it failed. Misusing the construction API
//! (for example negating a control-flow rule) is a programmer error and is
//! surfaced eagerly instead, as a panic from the fluent methods or as a
//! [`ConstructionError`] from the registry.
//!
//! [`Chain::execute`]: crate::chain::Chain::execute

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::predicates;

/// Rule name recorded when a required chain receives null.
pub const REQUIRED_RULE: &str = "required";
/// Rule name recorded for undeclared object fields.
pub const EXTRA_FIELD_RULE: &str = "extra_field";

pub(crate) const REQUIRED_TEMPLATE: &str = "{PATH} is a required field";
pub(crate) const EXTRA_FIELD_TEMPLATE: &str = "{PATH} is not an allowed field";

/// Ordered mapping from structural path to the failures recorded there.
///
/// The empty string is the root path. Insertion order is preserved for both
/// paths and the records within a path.
pub type PathErrors = IndexMap<String, Vec<ErrorRecord>>;

/// Result of executing a chain: `Ok(())` is the success sentinel.
pub type ValidationResult = Result<(), ValidationError>;

/// A single recorded failure.
///
/// Carries the rule identity (name and raw arguments), the failing value, and
/// the annotations of the chain that produced it. The chain label and message
/// template travel along unserialized so [`ErrorRecord::message`] can render a
/// human message later without the chain at hand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    /// Name of the failed rule: `"required"`, `"extra_field"`, a catalog name
    /// such as `"string"`, or a negated form such as `"not.string"`.
    pub rule: String,
    /// Raw arguments supplied when the rule was selected, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,
    /// The value that failed the rule. `Null` for missing required values.
    pub value: Value,
    /// Annotations copied from the chain at execution time.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, Value>,
    #[serde(skip)]
    label: String,
    #[serde(skip)]
    template: String,
}

impl ErrorRecord {
    /// Creates a record for `rule` with a failing `value`.
    pub fn new(rule: impl Into<String>, value: Value) -> Self {
        Self {
            rule: rule.into(),
            args: None,
            value,
            annotations: IndexMap::new(),
            label: String::new(),
            template: String::new(),
        }
    }

    /// Attaches the raw rule arguments.
    pub fn with_args(mut self, args: Option<Vec<Value>>) -> Self {
        self.args = args;
        self
    }

    /// Attaches the label of the producing chain, used for `{PATH}` rendering.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Attaches the message template (`{PATH}`/`{VALUE}` placeholders).
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Attaches chain annotations.
    pub fn with_annotations(mut self, annotations: IndexMap<String, Value>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Label of the chain that produced this record, empty when unlabeled.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The raw message template.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Renders the human message for this record.
    ///
    /// `{PATH}` substitutes the chain label when one was set, otherwise the
    /// structural `path` the record was filed under. `{VALUE}` substitutes the
    /// failing value.
    pub fn message(&self, path: &str) -> String {
        let shown = if self.label.is_empty() { path } else { &self.label };
        self.template
            .replace("{PATH}", shown)
            .replace("{VALUE}", &predicates::display(&self.value))
    }
}

/// The shape of a failure payload.
///
/// When failures exist at exactly one path and that path is the root, the
/// payload collapses to the flat record list so simple, non-nested failures
/// are not wrapped in an extra path layer. Every other outcome exposes the
/// full path-keyed mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Errors {
    /// Collapsed single-root failures.
    Flat(Vec<ErrorRecord>),
    /// Failures keyed by structural path.
    ByPath(PathErrors),
}

impl Errors {
    /// Flat record list, if this payload collapsed.
    pub fn as_flat(&self) -> Option<&[ErrorRecord]> {
        match self {
            Errors::Flat(records) => Some(records),
            Errors::ByPath(_) => None,
        }
    }

    /// Path-keyed mapping, if this payload did not collapse.
    pub fn as_by_path(&self) -> Option<&PathErrors> {
        match self {
            Errors::Flat(_) => None,
            Errors::ByPath(paths) => Some(paths),
        }
    }

    /// Records filed at `path`, regardless of shape.
    pub fn at(&self, path: &str) -> Option<&[ErrorRecord]> {
        match self {
            Errors::Flat(records) if path.is_empty() => Some(records),
            Errors::Flat(_) => None,
            Errors::ByPath(paths) => paths.get(path).map(Vec::as_slice),
        }
    }

    /// Total number of records in the payload.
    pub fn len(&self) -> usize {
        match self {
            Errors::Flat(records) => records.len(),
            Errors::ByPath(paths) => paths.values().map(Vec::len).sum(),
        }
    }

    /// Whether the payload holds no records. Never true for payloads built by
    /// the engine, which drops empty aggregations before reaching this type.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The failure payload returned by [`Chain::execute`]. Returned, never thrown.
///
/// [`Chain::execute`]: crate::chain::Chain::execute
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("validation failed")]
pub struct ValidationError {
    /// The recorded failures, collapsed or path-keyed.
    pub errors: Errors,
}

impl ValidationError {
    /// Builds the payload from a finalized aggregation, applying the
    /// single-root collapse rule.
    pub(crate) fn from_paths(mut paths: PathErrors) -> Self {
        let errors = if paths.len() == 1 && paths.contains_key("") {
            Errors::Flat(paths.swap_remove("").unwrap_or_default())
        } else {
            Errors::ByPath(paths)
        };
        Self { errors }
    }

    /// Renders every record into a human message, in recorded order.
    pub fn messages(&self) -> Vec<String> {
        match &self.errors {
            Errors::Flat(records) => records.iter().map(|r| r.message("")).collect(),
            Errors::ByPath(paths) => paths
                .iter()
                .flat_map(|(path, records)| records.iter().map(move |r| r.message(path)))
                .collect(),
        }
    }
}

/// A malformed validator definition, caught at construction time.
///
/// These are programmer errors, not data-validation outcomes: the fluent
/// `Chain` methods panic with the same messages, while registry-driven
/// construction surfaces them as values.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// The registry has no rule under this name.
    #[error("unknown rule `{0}`")]
    UnknownRule(String),

    /// Control-flow rules (`try`, `eval`) have no meaningful inversion.
    #[error("rule `{0}` is a control-flow rule and cannot be negated")]
    NotInvertible(String),

    /// Negating an object/array rule that carries nested validators does not
    /// semantically invert, so it is rejected outright.
    #[error("negated `{0}` cannot carry nested validators")]
    NegatedComposite(String),

    /// A registry factory rejected its arguments.
    #[error("rule `{rule}` cannot be built from the given arguments: {reason}")]
    BadArguments {
        /// Rule being constructed.
        rule: String,
        /// Why the arguments were rejected.
        reason: String,
    },
}
