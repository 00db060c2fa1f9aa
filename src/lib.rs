//! Builds composable graph filter queries from attribute comparisons written
//! in a scripting console.
//!
//! A [`namespace::Namespace`] exposes node and edge attributes by name. Each
//! comparison (`age > 30`, `name == "Alice"`, `weight != 0.5`) goes through a
//! [`query::ComparisonBuilder`], which checks the attribute's value type,
//! fills in domain bounds, and asks a [`query::FilterEngine`] for the
//! resulting query.

#![warn(missing_docs)]

pub mod config;
pub mod namespace;
pub mod query;
pub mod types;

pub use config::{ConfigError, ScriptingConfig};
pub use namespace::{Namespace, NamespaceBuilder, NamespaceRef};
pub use query::{
    Attribute, ComparisonBuilder, ComparisonOp, FilterEngine, FilterError, MemoryFilterEngine,
    Query, Range, ScriptFilter, Value,
};
pub use types::{AttributeScope, QueryId, ValueType};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;
