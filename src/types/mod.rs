#![forbid(unsafe_code)]

//! Shared identifiers and type tags used by attribute handles, the domain
//! registry, and the filter engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic type of the values stored in an attribute column.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Signed 8-bit integer column.
    Int8,
    /// Signed 16-bit integer column.
    Int16,
    /// Signed 32-bit integer column.
    Int32,
    /// Signed 64-bit integer column.
    Int64,
    /// 32-bit floating point column.
    Float32,
    /// 64-bit floating point column.
    Float64,
    /// Boolean column.
    Bool,
    /// UTF-8 string column.
    String,
}

impl ValueType {
    /// Every supported value type, numeric types first.
    pub const ALL: [ValueType; 8] = [
        ValueType::Int8,
        ValueType::Int16,
        ValueType::Int32,
        ValueType::Int64,
        ValueType::Float32,
        ValueType::Float64,
        ValueType::Bool,
        ValueType::String,
    ];

    /// Returns true for types with a numeric ordering.
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Returns true for the fixed-width integer types.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            ValueType::Int8 | ValueType::Int16 | ValueType::Int32 | ValueType::Int64
        )
    }

    /// Returns true for the floating point types.
    pub const fn is_float(self) -> bool {
        matches!(self, ValueType::Float32 | ValueType::Float64)
    }

    /// Stable lowercase name used in diagnostics and configuration.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Int8 => "int8",
            ValueType::Int16 => "int16",
            ValueType::Int32 => "int32",
            ValueType::Int64 => "int64",
            ValueType::Float32 => "float32",
            ValueType::Float64 => "float64",
            ValueType::Bool => "bool",
            ValueType::String => "string",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = UnknownValueType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| UnknownValueType(s.to_owned()))
    }
}

/// Returned when a type name does not match any [`ValueType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value type '{0}'")]
pub struct UnknownValueType(pub String);

/// Whether an attribute belongs to nodes or to edges.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeScope {
    /// Per-node data.
    Node,
    /// Per-edge data.
    Edge,
}

impl AttributeScope {
    /// Returns true for node-scoped attributes.
    pub const fn is_node(self) -> bool {
        matches!(self, AttributeScope::Node)
    }
}

impl fmt::Display for AttributeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeScope::Node => f.write_str("node"),
            AttributeScope::Edge => f.write_str("edge"),
        }
    }
}

/// Identifier assigned by a filter engine to every query it creates.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct QueryId(pub u64);

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u64> for QueryId {
    fn from(value: u64) -> Self {
        QueryId(value)
    }
}
