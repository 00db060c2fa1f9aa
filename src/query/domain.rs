//! Domain bounds for numeric value types and operand coercion.
//!
//! Ordering comparisons fill the open side of a range with the column type's
//! minimum or maximum representable value. Those limits live in an explicit
//! [`DomainRegistry`] populated at initialization; a numeric type without an
//! entry is a registration gap and surfaces as [`FilterError::Lookup`].

use std::cmp::Ordering;
use std::collections::BTreeMap;

use thiserror::Error;
use tracing::trace;

use crate::query::errors::FilterError;
use crate::query::Value;
use crate::types::ValueType;
use crate::Result;

/// Smallest and largest value representable by a numeric column type.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainBounds {
    /// Inclusive minimum.
    pub min: Value,
    /// Inclusive maximum.
    pub max: Value,
}

impl DomainBounds {
    /// Returns true when `value` lies within `[min, max]`.
    pub fn contains(&self, value: &Value) -> bool {
        matches!(
            value.numeric_cmp(&self.min),
            Some(Ordering::Greater | Ordering::Equal)
        ) && matches!(
            value.numeric_cmp(&self.max),
            Some(Ordering::Less | Ordering::Equal)
        )
    }
}

/// Native limits of a numeric value type, `None` for non-numeric types.
///
/// Floating point minimums are the most negative finite value, not the
/// smallest positive one.
pub fn native_bounds(value_type: ValueType) -> Option<DomainBounds> {
    let (min, max) = match value_type {
        ValueType::Int8 => (Value::Int(i8::MIN.into()), Value::Int(i8::MAX.into())),
        ValueType::Int16 => (Value::Int(i16::MIN.into()), Value::Int(i16::MAX.into())),
        ValueType::Int32 => (Value::Int(i32::MIN.into()), Value::Int(i32::MAX.into())),
        ValueType::Int64 => (Value::Int(i64::MIN), Value::Int(i64::MAX)),
        ValueType::Float32 => (
            Value::Float(f64::from(-f32::MAX)),
            Value::Float(f64::from(f32::MAX)),
        ),
        ValueType::Float64 => (Value::Float(-f64::MAX), Value::Float(f64::MAX)),
        ValueType::Bool | ValueType::String => return None,
    };
    Some(DomainBounds { min, max })
}

/// Registry mapping each supported numeric value type to its domain bounds.
#[derive(Clone, Debug)]
pub struct DomainRegistry {
    bounds: BTreeMap<ValueType, DomainBounds>,
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::native()
    }
}

impl DomainRegistry {
    /// Registry with no entries; every lookup fails.
    pub fn empty() -> Self {
        Self {
            bounds: BTreeMap::new(),
        }
    }

    /// Registry populated with the native limits of every numeric type.
    pub fn native() -> Self {
        let bounds = ValueType::ALL
            .into_iter()
            .filter_map(|ty| native_bounds(ty).map(|b| (ty, b)))
            .collect();
        Self { bounds }
    }

    /// Registers (or narrows) the bounds for a numeric type.
    ///
    /// Both bounds are normalized to the type's representation and must lie
    /// within its native limits with `min <= max`.
    pub fn register(&mut self, value_type: ValueType, min: Value, max: Value) -> Result<()> {
        let native = native_bounds(value_type).ok_or(FilterError::InvalidRange {
            reason: "domain bounds only apply to numeric types",
        })?;
        let invalid = |_| FilterError::InvalidRange {
            reason: "domain bound outside the type's native limits",
        };
        let min = coerce_operand(value_type, &min, &native).map_err(invalid)?;
        let max = coerce_operand(value_type, &max, &native).map_err(invalid)?;
        if min.numeric_cmp(&max) == Some(Ordering::Greater) {
            return Err(FilterError::InvalidRange {
                reason: "domain minimum exceeds maximum",
            });
        }
        trace!(value_type = %value_type, %min, %max, "domain bounds registered");
        self.bounds.insert(value_type, DomainBounds { min, max });
        Ok(())
    }

    /// Removes a type from the registry, returning whether it was present.
    pub fn unregister(&mut self, value_type: ValueType) -> bool {
        self.bounds.remove(&value_type).is_some()
    }

    /// Returns the `(min, max)` pair registered for `value_type`.
    pub fn bounds(&self, value_type: ValueType) -> Result<&DomainBounds> {
        self.bounds
            .get(&value_type)
            .ok_or(FilterError::Lookup { value_type })
    }

    /// Returns true when bounds are registered for `value_type`.
    pub fn contains(&self, value_type: ValueType) -> bool {
        self.bounds.contains_key(&value_type)
    }
}

/// Reasons an operand cannot be represented in a numeric column type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// Operand kind has no numeric interpretation.
    #[error("operand of kind '{found}' is not numeric")]
    NotNumeric {
        /// Kind of the supplied operand.
        found: &'static str,
    },
    /// Fractional operand supplied for an integer column.
    #[error("operand {0} is not integral")]
    Fractional(f64),
    /// NaN or infinite operand.
    #[error("operand must be finite")]
    NonFinite,
    /// Operand lies outside the registered domain.
    #[error("operand {value} outside domain [{min}, {max}]")]
    OutOfDomain {
        /// Normalized operand.
        value: Value,
        /// Domain minimum.
        min: Value,
        /// Domain maximum.
        max: Value,
    },
}

// 2^63 as f64; i64::MAX itself is not representable.
const I64_EXCLUSIVE_MAX: f64 = 9_223_372_036_854_775_808.0;

/// Converts `operand` into the representation of `value_type` and checks it
/// against `bounds`.
///
/// Integer columns yield [`Value::Int`], floating columns [`Value::Float`].
/// Integers widen to floats; integral floats narrow to integers.
pub fn coerce_operand(
    value_type: ValueType,
    operand: &Value,
    bounds: &DomainBounds,
) -> std::result::Result<Value, CoercionError> {
    let value = if value_type.is_integer() {
        match operand {
            Value::Int(v) => Value::Int(*v),
            Value::Float(f) if !f.is_finite() => return Err(CoercionError::NonFinite),
            Value::Float(f) if f.fract() != 0.0 => return Err(CoercionError::Fractional(*f)),
            Value::Float(f) if *f >= -I64_EXCLUSIVE_MAX && *f < I64_EXCLUSIVE_MAX => {
                Value::Int(*f as i64)
            }
            Value::Float(f) => {
                return Err(CoercionError::OutOfDomain {
                    value: Value::Float(*f),
                    min: bounds.min.clone(),
                    max: bounds.max.clone(),
                })
            }
            other => return Err(CoercionError::NotNumeric { found: other.kind() }),
        }
    } else if value_type.is_float() {
        let wide = match operand {
            Value::Int(v) => *v as f64,
            Value::Float(f) if !f.is_finite() => return Err(CoercionError::NonFinite),
            Value::Float(f) => *f,
            other => return Err(CoercionError::NotNumeric { found: other.kind() }),
        };
        if !bounds.contains(&Value::Float(wide)) {
            return Err(CoercionError::OutOfDomain {
                value: Value::Float(wide),
                min: bounds.min.clone(),
                max: bounds.max.clone(),
            });
        }
        Value::Float(round_to_column(value_type, wide))
    } else {
        return Err(CoercionError::NotNumeric {
            found: operand.kind(),
        });
    };

    if !bounds.contains(&value) {
        return Err(CoercionError::OutOfDomain {
            value,
            min: bounds.min.clone(),
            max: bounds.max.clone(),
        });
    }
    Ok(value)
}

// Float32 operands take the value a stored f32 widens to, so `> 0.1`
// excludes a stored `0.1f32` and `== 0.1` matches it.
fn round_to_column(value_type: ValueType, value: f64) -> f64 {
    match value_type {
        ValueType::Float32 => {
            let narrow = value as f32;
            if narrow.is_finite() {
                f64::from(narrow)
            } else {
                value
            }
        }
        _ => value,
    }
}

/// Normalizes an equality operand without ever failing.
///
/// Operands that convert cleanly take the column's representation; anything
/// else passes through unchanged and simply matches nothing.
pub fn coerce_equality_operand(value_type: ValueType, operand: Value) -> Value {
    match (value_type, operand) {
        (ty, Value::Int(v)) if ty.is_float() => Value::Float(round_to_column(ty, v as f64)),
        (ty, Value::Float(f)) if ty.is_float() && f.is_finite() => {
            Value::Float(round_to_column(ty, f))
        }
        (ty, Value::Float(f)) if ty.is_integer() => {
            if f.is_finite() && f.fract() == 0.0 && f >= -I64_EXCLUSIVE_MAX && f < I64_EXCLUSIVE_MAX
            {
                Value::Int(f as i64)
            } else {
                Value::Float(f)
            }
        }
        (_, other) => other,
    }
}
