//! # Veracity
//!
//! A fluent, chainable validation library for JSON-shaped values.
//!
//! Validators are built by chaining rule selections onto a [`Chain`], then
//! executed against a [`Value`]. Execution never panics on bad data: it
//! returns a [`ValidationError`] payload mapping structural paths to the
//! rules that failed there, ready to serialize for an API response.
//!
//! ```rust
//! use serde_json::json;
//! use veracity::Chain;
//!
//! let user = Chain::new("User").object([
//!     ("name", Chain::new("Name").string().length(1, Some(64))),
//!     ("age", Chain::new("Age").integer().gte(json!(0)).optional()),
//!     ("email", Chain::new("Email").email()),
//! ]);
//!
//! assert!(user
//!     .execute(&json!({ "name": "Ada", "age": 36, "email": "ada@example.com" }))
//!     .is_ok());
//!
//! let failure = user
//!     .execute(&json!({ "name": "Ada", "email": "not-an-email" }))
//!     .unwrap_err();
//! assert_eq!(
//!     failure.messages(),
//!     vec!["Email should be a valid email address".to_string()]
//! );
//! ```
//!
//! ## Semantics in brief
//!
//! - Every chain is **required** by default: `Null` (which also stands for
//!   absent object fields) fails with a single `required` record unless the
//!   chain was marked [`Chain::optional`].
//! - Rules run in selection order and every failure is recorded; execution
//!   does not stop at the first failed rule.
//! - Composite rules ([`Chain::object`], [`Chain::array`]) file nested
//!   failures under dotted paths such as `name.first`; [`Chain::try_`] passes
//!   when any alternative passes, and [`Chain::eval`] derives chains from the
//!   value at execution time.
//! - [`Chain::not`] inverts the next selected rule. Control-flow rules and
//!   schema-carrying composites reject negation at construction time.
//! - Chains are immutable once built and execution is side-effect free, so a
//!   chain behind an `Arc` can validate on many threads at once.
//!
//! Rules can also be selected by name through a [`Registry`], which is the
//! extension point for custom catalogs.

pub mod aggregator;
pub mod chain;
pub mod errors;
pub mod predicates;
pub mod registry;
pub mod rule;
pub mod rules;

pub use aggregator::Aggregator;
pub use chain::Chain;
pub use errors::{
    ConstructionError, ErrorRecord, Errors, PathErrors, ValidationError, ValidationResult,
    EXTRA_FIELD_RULE, REQUIRED_RULE,
};
pub use registry::{Registry, RuleFactory};
pub use rule::{Predicate, Rule, RuleKind};
pub use rules::{CardType, IpVersion};

pub use serde_json::Value;
