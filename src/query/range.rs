//! Interval value object consumed by range queries.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::query::errors::FilterError;
use crate::query::Value;
use crate::Result;

/// Closed, half-open, or open interval over a numeric value type.
///
/// `lower <= upper` always holds; a range over values without a numeric
/// ordering cannot be constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct Range {
    lower: Value,
    upper: Value,
    lower_inclusive: bool,
    upper_inclusive: bool,
}

impl Range {
    /// Creates a range, rejecting unordered or inverted bounds.
    pub fn new(
        lower: Value,
        upper: Value,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Result<Self> {
        match lower.numeric_cmp(&upper) {
            None => Err(FilterError::InvalidRange {
                reason: "bounds must be numeric values of the same kind",
            }),
            Some(Ordering::Greater) => Err(FilterError::InvalidRange {
                reason: "lower bound exceeds upper bound",
            }),
            Some(_) => Ok(Self {
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            }),
        }
    }

    /// Closed range `[value, value]`.
    pub fn point(value: Value) -> Result<Self> {
        Self::new(value.clone(), value, true, true)
    }

    /// Lower bound value.
    pub fn lower(&self) -> &Value {
        &self.lower
    }

    /// Upper bound value.
    pub fn upper(&self) -> &Value {
        &self.upper
    }

    /// Whether the lower bound is part of the range.
    pub fn lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    /// Whether the upper bound is part of the range.
    pub fn upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    /// Lower bound expressed as a [`Bound`].
    pub fn lower_bound(&self) -> Bound<&Value> {
        if self.lower_inclusive {
            Bound::Included(&self.lower)
        } else {
            Bound::Excluded(&self.lower)
        }
    }

    /// Upper bound expressed as a [`Bound`].
    pub fn upper_bound(&self) -> Bound<&Value> {
        if self.upper_inclusive {
            Bound::Included(&self.upper)
        } else {
            Bound::Excluded(&self.upper)
        }
    }

    /// Returns true when no value can satisfy the range, e.g. `(max, max]`.
    pub fn is_empty(&self) -> bool {
        self.lower.numeric_cmp(&self.upper) == Some(Ordering::Equal)
            && !(self.lower_inclusive && self.upper_inclusive)
    }
}

// Wire shape; deserialized ranges go through `Range::new`.
#[derive(Deserialize)]
struct RawRange {
    lower: Value,
    upper: Value,
    lower_inclusive: bool,
    upper_inclusive: bool,
}

impl TryFrom<RawRange> for Range {
    type Error = FilterError;

    fn try_from(raw: RawRange) -> Result<Self> {
        Range::new(raw.lower, raw.upper, raw.lower_inclusive, raw.upper_inclusive)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower_inclusive { '[' } else { '(' };
        let close = if self.upper_inclusive { ']' } else { ')' };
        write!(f, "{open}{}, {}{close}", self.lower, self.upper)
    }
}
