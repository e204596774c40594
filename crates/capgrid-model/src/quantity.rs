//! Validated non-negative quantities and boundary parsing
//!
//! Effort and capacity values only enter the store as [`Quantity`], so NaN,
//! infinities and negative numbers are rejected before any mutation runs.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::iter::Sum;
use std::ops::Add;

/// Tolerance used when comparing summed effort against capacity
pub const TOLERANCE: f64 = 1e-9;

/// Finite, non-negative effort or capacity amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Quantity(f64);

impl Quantity {
    /// Zero
    pub const ZERO: Self = Self(0.0);

    /// Capacity given to cells created without an explicit one
    pub const DEFAULT_CAPACITY: Self = Self(20.0);

    /// Create a validated quantity
    ///
    /// # Errors
    /// Returns error if the value is NaN, infinite or negative
    pub fn new(value: f64) -> Result<Self, QuantityError> {
        if value.is_nan() {
            return Err(QuantityError::NotANumber);
        }
        if value.is_infinite() {
            return Err(QuantityError::Infinite);
        }
        if value < 0.0 {
            return Err(QuantityError::Negative(value));
        }
        // normalise -0.0
        Ok(Self(value.abs()))
    }

    /// Raw value
    #[inline]
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Whether the amount is zero
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.abs() < TOLERANCE
    }

    /// Compare within [`TOLERANCE`]
    #[inline]
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        (self.0 - other.0).abs() < TOLERANCE
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<f64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for f64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// Parse user input from an inline or bulk editor
///
/// Surrounding whitespace is ignored.
///
/// # Errors
/// Returns error for empty input, non-numeric text, NaN, infinities or
/// negative numbers
pub fn parse_quantity(input: &str) -> Result<Quantity, QuantityError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(QuantityError::Empty);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| QuantityError::Malformed(trimmed.to_string()))?;
    Quantity::new(value)
}

/// Errors related to numeric input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuantityError {
    /// Nothing typed
    #[error("value must not be empty")]
    Empty,

    /// Not a number
    #[error("value '{0}' is not a number")]
    Malformed(String),

    /// NaN
    #[error("value must not be NaN")]
    NotANumber,

    /// Infinite
    #[error("value must be finite")]
    Infinite,

    /// Below zero
    #[error("value must not be negative, got {0}")]
    Negative(f64),
}
