//! Attribute capability contract and the built-in attribute variants.

use std::fmt;

use crate::query::domain::{coerce_equality_operand, coerce_operand, native_bounds};
use crate::query::engine::{DegreeKind, FilterEngine, FilterPredicate, Query};
use crate::query::range::Range;
use crate::query::Value;
use crate::types::{AttributeScope, ValueType};
use crate::Result;

/// One column of per-node or per-edge data, as seen by the comparison
/// builder.
///
/// Variants decide how a range or an equality turns into a query; the
/// builder decides when each hook runs and with which bounds.
pub trait Attribute {
    /// Name the attribute is bound to in its namespace.
    fn name(&self) -> &str;

    /// Semantic type of the column's values.
    fn value_type(&self) -> ValueType;

    /// Whether the attribute belongs to nodes or edges.
    fn scope(&self) -> AttributeScope;

    /// True for node attributes, false for edge attributes.
    fn is_node_scoped(&self) -> bool {
        self.scope().is_node()
    }

    /// Builds a query matching values inside `range`.
    fn build_range_query<E>(&self, engine: &E, range: Range) -> Result<Query>
    where
        E: FilterEngine + ?Sized;

    /// Builds a query matching values equal to `operand`.
    fn build_equals_query<E>(&self, engine: &E, operand: Value) -> Result<Query>
    where
        E: FilterEngine + ?Sized;
}

/// Attribute backed by a stored data column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnAttribute {
    name: String,
    scope: AttributeScope,
    value_type: ValueType,
}

impl ColumnAttribute {
    /// Creates a column attribute.
    pub fn new(name: impl Into<String>, scope: AttributeScope, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            scope,
            value_type,
        }
    }
}

impl Attribute for ColumnAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn scope(&self) -> AttributeScope {
        self.scope
    }

    fn build_range_query<E>(&self, engine: &E, range: Range) -> Result<Query>
    where
        E: FilterEngine + ?Sized,
    {
        Ok(engine.create_query(FilterPredicate::Range {
            scope: self.scope,
            attribute: self.name.clone(),
            range,
        })?)
    }

    fn build_equals_query<E>(&self, engine: &E, operand: Value) -> Result<Query>
    where
        E: FilterEngine + ?Sized,
    {
        Ok(engine.create_query(FilterPredicate::Equals {
            scope: self.scope,
            attribute: self.name.clone(),
            value: coerce_equality_operand(self.value_type, operand),
        })?)
    }
}

/// Node attribute derived from graph structure rather than stored data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TopologyAttribute {
    degree: DegreeKind,
}

impl TopologyAttribute {
    /// Creates a topology attribute for the given degree measure.
    pub const fn new(degree: DegreeKind) -> Self {
        Self { degree }
    }

    /// Measure this attribute filters on.
    pub const fn degree(&self) -> DegreeKind {
        self.degree
    }
}

impl Attribute for TopologyAttribute {
    fn name(&self) -> &str {
        self.degree.name()
    }

    fn value_type(&self) -> ValueType {
        ValueType::Int32
    }

    fn scope(&self) -> AttributeScope {
        AttributeScope::Node
    }

    fn build_range_query<E>(&self, engine: &E, range: Range) -> Result<Query>
    where
        E: FilterEngine + ?Sized,
    {
        Ok(engine.create_query(FilterPredicate::Degree {
            degree: self.degree,
            range,
        })?)
    }

    // Degrees have no equality predicate; a point range stands in for one.
    // Operands with no Int32 form get an empty range and match nothing.
    // Equality never consults the namespace's domain registry, for degrees
    // as for columns.
    fn build_equals_query<E>(&self, engine: &E, operand: Value) -> Result<Query>
    where
        E: FilterEngine + ?Sized,
    {
        let range = native_bounds(ValueType::Int32)
            .and_then(|bounds| coerce_operand(ValueType::Int32, &operand, &bounds).ok())
            .map_or_else(
                || Range::new(Value::Int(0), Value::Int(0), false, false),
                Range::point,
            )?;
        self.build_range_query(engine, range)
    }
}

/// Attribute handle as stored in a namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeHandle {
    /// Stored data column.
    Column(ColumnAttribute),
    /// Structural measure.
    Topology(TopologyAttribute),
}

impl Attribute for AttributeHandle {
    fn name(&self) -> &str {
        match self {
            AttributeHandle::Column(attr) => attr.name(),
            AttributeHandle::Topology(attr) => attr.name(),
        }
    }

    fn value_type(&self) -> ValueType {
        match self {
            AttributeHandle::Column(attr) => attr.value_type(),
            AttributeHandle::Topology(attr) => attr.value_type(),
        }
    }

    fn scope(&self) -> AttributeScope {
        match self {
            AttributeHandle::Column(attr) => attr.scope(),
            AttributeHandle::Topology(attr) => attr.scope(),
        }
    }

    fn build_range_query<E>(&self, engine: &E, range: Range) -> Result<Query>
    where
        E: FilterEngine + ?Sized,
    {
        match self {
            AttributeHandle::Column(attr) => attr.build_range_query(engine, range),
            AttributeHandle::Topology(attr) => attr.build_range_query(engine, range),
        }
    }

    fn build_equals_query<E>(&self, engine: &E, operand: Value) -> Result<Query>
    where
        E: FilterEngine + ?Sized,
    {
        match self {
            AttributeHandle::Column(attr) => attr.build_equals_query(engine, operand),
            AttributeHandle::Topology(attr) => attr.build_equals_query(engine, operand),
        }
    }
}

impl From<ColumnAttribute> for AttributeHandle {
    fn from(attr: ColumnAttribute) -> Self {
        AttributeHandle::Column(attr)
    }
}

impl From<TopologyAttribute> for AttributeHandle {
    fn from(attr: TopologyAttribute) -> Self {
        AttributeHandle::Topology(attr)
    }
}

impl fmt::Display for AttributeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.scope(), self.name(), self.value_type())
    }
}
