//! Scripting-facing result of a comparison.

use std::fmt;

use tracing::debug;

use crate::namespace::NamespaceRef;
use crate::query::engine::{FilterEngine, FilterPredicate, Query};
use crate::query::errors::FilterError;
use crate::types::AttributeScope;
use crate::Result;

/// A constructed query bound to the namespace it came from.
///
/// The scripting evaluator keeps these around so that comparisons can be
/// combined further before the query is handed to the filter engine.
#[derive(Clone, Debug)]
pub struct ScriptFilter {
    namespace: NamespaceRef,
    query: Query,
}

impl ScriptFilter {
    /// Pairs a namespace reference with a query.
    pub fn new(namespace: NamespaceRef, query: Query) -> Self {
        Self { namespace, query }
    }

    /// Namespace the filter was built in.
    pub fn namespace(&self) -> &NamespaceRef {
        &self.namespace
    }

    /// Underlying query.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Consumes the filter, returning the query.
    pub fn into_query(self) -> Query {
        self.query
    }

    /// Filter matching what both operands match.
    pub fn and<E>(self, other: ScriptFilter, engine: &E) -> Result<ScriptFilter>
    where
        E: FilterEngine + ?Sized,
    {
        self.combine(other, FilterPredicate::Intersection, engine)
    }

    /// Filter matching what either operand matches.
    pub fn or<E>(self, other: ScriptFilter, engine: &E) -> Result<ScriptFilter>
    where
        E: FilterEngine + ?Sized,
    {
        self.combine(other, FilterPredicate::Union, engine)
    }

    /// Filter matching what this one does not.
    ///
    /// Mixed-scope composites default to node negation.
    pub fn not<E>(self, engine: &E) -> Result<ScriptFilter>
    where
        E: FilterEngine + ?Sized,
    {
        let scope = self.query.scope().unwrap_or(AttributeScope::Node);
        let mut negation = engine.create_query(FilterPredicate::Not { scope })?;
        engine.set_sub_query(&mut negation, self.query)?;
        debug!(query = %negation, "filter negated");
        Ok(ScriptFilter::new(self.namespace, negation))
    }

    /// Renders the query as JSON for front-ends.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.query).map_err(|err| FilterError::Serialization(err.to_string()))
    }

    fn combine<E>(
        self,
        other: ScriptFilter,
        predicate: FilterPredicate,
        engine: &E,
    ) -> Result<ScriptFilter>
    where
        E: FilterEngine + ?Sized,
    {
        if !self.namespace.same_as(&other.namespace) {
            return Err(FilterError::NamespaceMismatch {
                left: self.namespace.name().to_owned(),
                right: other.namespace.name().to_owned(),
            });
        }
        let mut parent = engine.create_query(predicate)?;
        engine.set_sub_query(&mut parent, self.query)?;
        engine.set_sub_query(&mut parent, other.query)?;
        debug!(query = %parent, "filters combined");
        Ok(ScriptFilter::new(self.namespace, parent))
    }
}

impl fmt::Display for ScriptFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.namespace.name(), self.query)
    }
}
