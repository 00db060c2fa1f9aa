#![forbid(unsafe_code)]

use std::fmt;

use thiserror::Error;

use crate::query::builder::ComparisonOp;
use crate::query::engine::EngineError;
use crate::types::ValueType;

/// Structured errors raised while turning a comparison into a query.
///
/// Every variant is raised synchronously at the comparison call and carries
/// enough context for the scripting console to report it verbatim.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// The operator is not defined for the attribute's value type, or the
    /// operand cannot be represented in it.
    #[error("unsupported operator '{op}' for attribute type '{value_type}': {reason}")]
    TypeCompatibility {
        /// Operator requested by the caller.
        op: ComparisonOp,
        /// Value type of the attribute column.
        value_type: ValueType,
        /// Human-readable cause.
        reason: String,
    },
    /// No domain bounds are registered for a numeric value type.
    #[error("no domain bounds registered for value type '{value_type}'")]
    Lookup {
        /// Type whose bounds were requested.
        value_type: ValueType,
    },
    /// Range bounds are unordered or inverted.
    #[error("invalid range: {reason}")]
    InvalidRange {
        /// Which invariant was violated.
        reason: &'static str,
    },
    /// The filter engine rejected a query-construction request.
    #[error("filter engine misuse: {0}")]
    EngineMisuse(#[from] EngineError),
    /// No attribute with this name exists in the namespace.
    #[error("unknown attribute '{name}'")]
    UnknownAttribute {
        /// Requested attribute name.
        name: String,
    },
    /// An attribute with this name was already registered.
    #[error("attribute '{name}' already registered")]
    DuplicateAttribute {
        /// Conflicting attribute name.
        name: String,
    },
    /// Two filters from different namespaces were combined.
    #[error("cannot combine filters from namespaces '{left}' and '{right}'")]
    NamespaceMismatch {
        /// Namespace of the left operand.
        left: String,
        /// Namespace of the right operand.
        right: String,
    },
    /// Query could not be rendered for the front-end.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl FilterError {
    /// Builds a [`FilterError::TypeCompatibility`] for an operator and type.
    pub fn incompatible(op: ComparisonOp, value_type: ValueType, reason: impl Into<String>) -> Self {
        FilterError::TypeCompatibility {
            op,
            value_type,
            reason: reason.into(),
        }
    }

    /// Re-labels a type-compatibility error with the operator the caller
    /// actually wrote; other variants pass through.
    pub fn with_op(self, op: ComparisonOp) -> Self {
        match self {
            FilterError::TypeCompatibility {
                value_type, reason, ..
            } => FilterError::TypeCompatibility {
                op,
                value_type,
                reason,
            },
            other => other,
        }
    }

    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::TypeCompatibility { .. } => "TypeCompatibility",
            FilterError::Lookup { .. } => "Lookup",
            FilterError::InvalidRange { .. } => "InvalidRange",
            FilterError::EngineMisuse(_) => "EngineMisuse",
            FilterError::UnknownAttribute { .. } => "UnknownAttribute",
            FilterError::DuplicateAttribute { .. } => "DuplicateAttribute",
            FilterError::NamespaceMismatch { .. } => "NamespaceMismatch",
            FilterError::Serialization(_) => "Serialization",
        }
    }
}

/// Convenience wrapper that formats filter errors with their codes.
pub struct FilterErrorWithCode<'a>(pub &'a FilterError);

impl fmt::Display for FilterErrorWithCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.0.code(), self.0)
    }
}
