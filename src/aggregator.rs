//! Per-execution error aggregation
//!
//! Every call to [`Chain::execute`] builds a fresh [`Aggregator`], threads it
//! through each rule predicate, and finalizes it into the returned result.
//! Composite rules merge the outcomes of nested chains into the aggregator at
//! computed sub-paths, which is how failures inside nested objects and arrays
//! surface at dotted paths like `phones.1.number`.
//!
//! [`Chain::execute`]: crate::chain::Chain::execute

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::{ErrorRecord, Errors, PathErrors, ValidationResult};

/// Accumulator of path-keyed error records for one execution.
///
/// Also carries the executing chain's annotations, so rules that file records
/// directly (the object rule's `extra_field`) can copy them onto those
/// records the same way the chain does for its own failures.
///
/// Invariant: a path with zero records is never present as a key.
#[derive(Debug, Default)]
pub struct Aggregator {
    errors: PathErrors,
    annotations: IndexMap<String, Value>,
}

impl Aggregator {
    /// Creates an empty aggregator with no chain annotations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregator carrying the executing chain's annotations.
    pub fn for_chain(annotations: IndexMap<String, Value>) -> Self {
        Self { errors: PathErrors::new(), annotations }
    }

    /// Annotations of the chain driving this execution.
    pub fn annotations(&self) -> &IndexMap<String, Value> {
        &self.annotations
    }

    /// Files a single record at `path` (empty string for root).
    pub fn append(&mut self, record: ErrorRecord, path: impl Into<String>) {
        self.errors.entry(path.into()).or_default().push(record);
    }

    /// Files records at `path`, preserving their order. No-op when empty.
    pub fn append_all(&mut self, records: Vec<ErrorRecord>, path: &str) {
        if records.is_empty() {
            return;
        }
        self.errors
            .entry(path.to_string())
            .or_default()
            .extend(records);
    }

    /// Merges the outcome of a nested chain at `path`.
    ///
    /// Success merges nothing. A collapsed flat payload is appended at `path`
    /// directly; a path-keyed payload is re-keyed by prefixing each sub-path
    /// with `path` joined by `.`, preserving record order throughout.
    pub fn merge(&mut self, result: ValidationResult, path: &str) {
        let Err(failure) = result else { return };

        match failure.errors {
            Errors::Flat(records) => self.append_all(records, path),
            Errors::ByPath(paths) => {
                for (sub_path, records) in paths {
                    let joined = join_paths(path, &sub_path);
                    self.append_all(records, &joined);
                }
            }
        }
    }

    /// Whether anything has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finalizes the aggregation: `None` when nothing failed, otherwise the
    /// raw path-keyed mapping. Collapsing to a flat list is the caller's
    /// decision, taken only at the top-level execute.
    pub fn finish(self) -> Option<PathErrors> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors)
        }
    }
}

fn join_paths(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (_, true) => parent.to_string(),
        _ => format!("{parent}.{child}"),
    }
}
