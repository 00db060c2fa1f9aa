//! Comparison builder turning `attribute OP operand` into filter queries.

use std::fmt;

use tracing::debug;

use crate::namespace::NamespaceRef;
use crate::query::attribute::Attribute;
use crate::query::domain::{coerce_operand, DomainRegistry};
use crate::query::engine::{FilterEngine, FilterPredicate};
use crate::query::errors::FilterError;
use crate::query::filter::ScriptFilter;
use crate::query::range::Range;
use crate::query::Value;
use crate::types::AttributeScope;
use crate::Result;

/// Comparison operators a scripting evaluator can apply to an attribute.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ComparisonOp {
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl ComparisonOp {
    /// Operator symbol as written in the console.
    pub const fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Which end of the range the operand occupies.
#[derive(Copy, Clone)]
enum OperandSide {
    Lower,
    Upper,
}

/// Builds queries for one attribute.
///
/// The engine, the domain registry, and the namespace are supplied at
/// construction; the builder never looks them up on its own. Every method
/// returns a fresh [`ScriptFilter`] and leaves no state behind, so repeated
/// calls yield equivalent but independent queries.
pub struct ComparisonBuilder<'a, A, E: ?Sized> {
    attribute: &'a A,
    engine: &'a E,
    domains: &'a DomainRegistry,
    namespace: NamespaceRef,
}

impl<'a, A, E> ComparisonBuilder<'a, A, E>
where
    A: Attribute,
    E: FilterEngine + ?Sized,
{
    /// Creates a builder for `attribute`.
    pub fn new(
        attribute: &'a A,
        engine: &'a E,
        domains: &'a DomainRegistry,
        namespace: NamespaceRef,
    ) -> Self {
        Self {
            attribute,
            engine,
            domains,
            namespace,
        }
    }

    /// Attribute the comparisons apply to.
    pub fn attribute(&self) -> &A {
        self.attribute
    }

    /// Namespace every produced filter is bound to.
    pub fn namespace(&self) -> &NamespaceRef {
        &self.namespace
    }

    /// `attribute > operand`: `(operand, max]`.
    pub fn gt<V>(&self, operand: V) -> Result<ScriptFilter>
    where
        V: Into<Value>,
    {
        self.ordering(ComparisonOp::Gt, operand.into(), OperandSide::Lower, false)
    }

    /// `attribute >= operand`: `[operand, max]`.
    pub fn ge<V>(&self, operand: V) -> Result<ScriptFilter>
    where
        V: Into<Value>,
    {
        self.ordering(ComparisonOp::Ge, operand.into(), OperandSide::Lower, true)
    }

    /// `attribute < operand`: `[min, operand)`.
    pub fn lt<V>(&self, operand: V) -> Result<ScriptFilter>
    where
        V: Into<Value>,
    {
        self.ordering(ComparisonOp::Lt, operand.into(), OperandSide::Upper, false)
    }

    /// `attribute <= operand`: `[min, operand]`.
    pub fn le<V>(&self, operand: V) -> Result<ScriptFilter>
    where
        V: Into<Value>,
    {
        self.ordering(ComparisonOp::Le, operand.into(), OperandSide::Upper, true)
    }

    /// `attribute == operand`, for any value type.
    pub fn eq<V>(&self, operand: V) -> Result<ScriptFilter>
    where
        V: Into<Value>,
    {
        let query = self
            .attribute
            .build_equals_query(self.engine, operand.into())?;
        debug!(
            op = %ComparisonOp::Eq,
            attribute = self.attribute.name(),
            query = %query,
            "comparison built"
        );
        Ok(ScriptFilter::new(self.namespace.clone(), query))
    }

    /// `attribute != operand`, built as the negation of an equality query.
    pub fn ne<V>(&self, operand: V) -> Result<ScriptFilter>
    where
        V: Into<Value>,
    {
        let equals = self
            .attribute
            .build_equals_query(self.engine, operand.into())
            .map_err(|err| err.with_op(ComparisonOp::Ne))?;
        let scope = if self.attribute.is_node_scoped() {
            AttributeScope::Node
        } else {
            AttributeScope::Edge
        };
        let mut negation = self.engine.create_query(FilterPredicate::Not { scope })?;
        self.engine.set_sub_query(&mut negation, equals)?;
        debug!(
            op = %ComparisonOp::Ne,
            attribute = self.attribute.name(),
            query = %negation,
            "comparison built"
        );
        Ok(ScriptFilter::new(self.namespace.clone(), negation))
    }

    /// Dispatches on an operator chosen at runtime.
    pub fn compare<V>(&self, op: ComparisonOp, operand: V) -> Result<ScriptFilter>
    where
        V: Into<Value>,
    {
        match op {
            ComparisonOp::Gt => self.gt(operand),
            ComparisonOp::Ge => self.ge(operand),
            ComparisonOp::Lt => self.lt(operand),
            ComparisonOp::Le => self.le(operand),
            ComparisonOp::Eq => self.eq(operand),
            ComparisonOp::Ne => self.ne(operand),
        }
    }

    fn ordering(
        &self,
        op: ComparisonOp,
        operand: Value,
        side: OperandSide,
        inclusive: bool,
    ) -> Result<ScriptFilter> {
        let value_type = self.attribute.value_type();
        if !value_type.is_numeric() {
            return Err(FilterError::incompatible(
                op,
                value_type,
                "operator requires a numeric attribute",
            ));
        }
        let bounds = self
            .domains
            .bounds(value_type)
            .map_err(|err| FilterError::incompatible(op, value_type, err.to_string()))?;
        let operand = coerce_operand(value_type, &operand, bounds)
            .map_err(|err| FilterError::incompatible(op, value_type, err.to_string()))?;
        let range = match side {
            OperandSide::Lower => Range::new(operand, bounds.max.clone(), inclusive, true)?,
            OperandSide::Upper => Range::new(bounds.min.clone(), operand, true, inclusive)?,
        };
        let query = self.attribute.build_range_query(self.engine, range)?;
        debug!(
            op = %op,
            attribute = self.attribute.name(),
            query = %query,
            "comparison built"
        );
        Ok(ScriptFilter::new(self.namespace.clone(), query))
    }
}
