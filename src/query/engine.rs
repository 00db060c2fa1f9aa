//! Filter engine contract and the in-memory query constructor.
//!
//! Attribute variants and the comparison builder never assemble query trees
//! themselves. They hand a [`FilterPredicate`] to a [`FilterEngine`], which
//! assigns identifiers and enforces the shape rules of each predicate kind.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::query::range::Range;
use crate::query::Value;
use crate::types::{AttributeScope, QueryId};

/// Graph-structure measure filtered by topology attributes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeKind {
    /// Total number of incident edges.
    Degree,
    /// Number of incoming edges.
    InDegree,
    /// Number of outgoing edges.
    OutDegree,
}

impl DegreeKind {
    /// Attribute name under which the measure is exposed.
    pub const fn name(self) -> &'static str {
        match self {
            DegreeKind::Degree => "degree",
            DegreeKind::InDegree => "indegree",
            DegreeKind::OutDegree => "outdegree",
        }
    }
}

/// Root predicate of a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterPredicate {
    /// Attribute value within a range.
    Range {
        /// Node or edge attribute.
        scope: AttributeScope,
        /// Column name.
        attribute: String,
        /// Accepted interval.
        range: Range,
    },
    /// Attribute value equal to a literal.
    Equals {
        /// Node or edge attribute.
        scope: AttributeScope,
        /// Column name.
        attribute: String,
        /// Literal to match.
        value: Value,
    },
    /// Node degree within a range.
    Degree {
        /// Which degree measure.
        degree: DegreeKind,
        /// Accepted interval.
        range: Range,
    },
    /// Matches everything its single subquery does not.
    Not {
        /// Whether nodes or edges are negated.
        scope: AttributeScope,
    },
    /// Matches what every subquery matches.
    Intersection,
    /// Matches what any subquery matches.
    Union,
}

impl FilterPredicate {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            FilterPredicate::Range { .. } => "range",
            FilterPredicate::Equals { .. } => "equals",
            FilterPredicate::Degree { .. } => "degree",
            FilterPredicate::Not { .. } => "not",
            FilterPredicate::Intersection => "intersection",
            FilterPredicate::Union => "union",
        }
    }

    /// Scope the predicate applies to; composites have none of their own.
    pub fn scope(&self) -> Option<AttributeScope> {
        match self {
            FilterPredicate::Range { scope, .. }
            | FilterPredicate::Equals { scope, .. }
            | FilterPredicate::Not { scope } => Some(*scope),
            FilterPredicate::Degree { .. } => Some(AttributeScope::Node),
            FilterPredicate::Intersection | FilterPredicate::Union => None,
        }
    }

    /// Leaves accept no subqueries.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            FilterPredicate::Range { .. }
                | FilterPredicate::Equals { .. }
                | FilterPredicate::Degree { .. }
        )
    }
}

/// Structured filter description: a root predicate plus subqueries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Query {
    id: QueryId,
    predicate: FilterPredicate,
    subqueries: Vec<Query>,
}

impl Query {
    /// Engine-assigned identifier.
    pub fn id(&self) -> QueryId {
        self.id
    }

    /// Root predicate.
    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    /// Attached subqueries, in attachment order.
    pub fn subqueries(&self) -> &[Query] {
        &self.subqueries
    }

    /// Scope of the query; composites inherit it from their subqueries when
    /// all of them agree.
    pub fn scope(&self) -> Option<AttributeScope> {
        if let Some(scope) = self.predicate.scope() {
            return Some(scope);
        }
        let mut scopes = self.subqueries.iter().map(Query::scope);
        let first = scopes.next()??;
        scopes.all(|s| s == Some(first)).then_some(first)
    }

    /// Structural equality ignoring query identifiers.
    pub fn is_equivalent(&self, other: &Query) -> bool {
        self.predicate == other.predicate
            && self.subqueries.len() == other.subqueries.len()
            && self
                .subqueries
                .iter()
                .zip(&other.subqueries)
                .all(|(a, b)| a.is_equivalent(b))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.predicate {
            FilterPredicate::Range {
                scope,
                attribute,
                range,
            } => write!(f, "{scope}.{attribute} in {range}"),
            FilterPredicate::Equals {
                scope,
                attribute,
                value,
            } => write!(f, "{scope}.{attribute} == {value}"),
            FilterPredicate::Degree { degree, range } => {
                write!(f, "node.{} in {range}", degree.name())
            }
            FilterPredicate::Not { scope } => {
                write!(f, "NOT[{scope}](")?;
                write_joined(f, &self.subqueries, ", ")?;
                f.write_str(")")
            }
            FilterPredicate::Intersection => {
                f.write_str("(")?;
                write_joined(f, &self.subqueries, " AND ")?;
                f.write_str(")")
            }
            FilterPredicate::Union => {
                f.write_str("(")?;
                write_joined(f, &self.subqueries, " OR ")?;
                f.write_str(")")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, queries: &[Query], sep: &str) -> fmt::Result {
    for (idx, query) in queries.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{query}")?;
    }
    Ok(())
}

/// Rejections raised by a filter engine for malformed construction requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Predicate names no attribute.
    #[error("predicate requires a non-empty attribute name")]
    EmptyAttributeName,
    /// Leaf predicates cannot carry subqueries.
    #[error("{predicate} predicate does not accept subqueries")]
    SubqueryNotAccepted {
        /// Name of the parent predicate.
        predicate: &'static str,
    },
    /// Negation already has its single subquery.
    #[error("negation accepts exactly one subquery")]
    NegationArity,
    /// Negation scope differs from its subquery's scope.
    #[error("{expected} negation cannot wrap a {found} query")]
    ScopeMismatch {
        /// Scope of the negation.
        expected: AttributeScope,
        /// Scope of the offered subquery.
        found: AttributeScope,
    },
}

/// Query-construction facilities of the filter engine.
///
/// Implementations must be safe for concurrent use; the comparison builder
/// may be driven from several evaluator threads at once.
pub trait FilterEngine: Send + Sync {
    /// Creates a new query rooted at `predicate`.
    fn create_query(&self, predicate: FilterPredicate) -> Result<Query, EngineError>;

    /// Attaches `child` as a subquery of `parent`.
    fn set_sub_query(&self, parent: &mut Query, child: Query) -> Result<(), EngineError>;
}

/// Engine that builds and validates query trees in memory.
#[derive(Debug, Default)]
pub struct MemoryFilterEngine {
    next_id: AtomicU64,
}

impl MemoryFilterEngine {
    /// Creates an engine whose first query id is zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queries created so far.
    pub fn queries_created(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl FilterEngine for MemoryFilterEngine {
    fn create_query(&self, predicate: FilterPredicate) -> Result<Query, EngineError> {
        match &predicate {
            FilterPredicate::Range { attribute, .. } | FilterPredicate::Equals { attribute, .. }
                if attribute.trim().is_empty() =>
            {
                return Err(EngineError::EmptyAttributeName);
            }
            _ => {}
        }
        let id = QueryId(self.next_id.fetch_add(1, Ordering::Relaxed));
        trace!(query = %id, predicate = predicate.name(), "query created");
        Ok(Query {
            id,
            predicate,
            subqueries: Vec::new(),
        })
    }

    fn set_sub_query(&self, parent: &mut Query, child: Query) -> Result<(), EngineError> {
        match parent.predicate {
            ref leaf if leaf.is_leaf() => {
                return Err(EngineError::SubqueryNotAccepted {
                    predicate: leaf.name(),
                });
            }
            FilterPredicate::Not { scope } => {
                if !parent.subqueries.is_empty() {
                    return Err(EngineError::NegationArity);
                }
                if let Some(found) = child.scope() {
                    if found != scope {
                        return Err(EngineError::ScopeMismatch {
                            expected: scope,
                            found,
                        });
                    }
                }
            }
            _ => {}
        }
        trace!(parent = %parent.id, child = %child.id, "subquery attached");
        parent.subqueries.push(child);
        Ok(())
    }
}
