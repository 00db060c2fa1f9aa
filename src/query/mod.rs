#![forbid(unsafe_code)]

//! Attribute comparison queries.
//!
//! This module turns comparison expressions written against attribute handles
//! into query trees for the filter engine, including domain bounds, range
//! construction, and negation.

/// Attribute capability contract and the built-in attribute variants.
///
/// Each variant decides how ranges and equalities become engine predicates.
pub mod attribute;

/// Comparison builder exposing `gt`, `ge`, `lt`, `le`, `eq`, and `ne`.
pub mod builder;

/// Domain bounds registry and operand coercion for numeric value types.
pub mod domain;

/// Filter engine contract, query trees, and the in-memory engine.
pub mod engine;

/// Error types surfaced to the scripting evaluator.
pub mod errors;

/// Scripting-facing filter handle and logical composition.
pub mod filter;

/// Interval value object used by range predicates.
pub mod range;

/// Canonical scalar values.
pub mod value;

pub use attribute::{Attribute, AttributeHandle, ColumnAttribute, TopologyAttribute};
pub use builder::{ComparisonBuilder, ComparisonOp};
pub use domain::{DomainBounds, DomainRegistry};
pub use engine::{DegreeKind, EngineError, FilterEngine, FilterPredicate, MemoryFilterEngine, Query};
pub use errors::{FilterError, FilterErrorWithCode};
pub use filter::ScriptFilter;
pub use range::Range;
pub use value::Value;
