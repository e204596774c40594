//! Allocation cells and their derived status

use crate::quantity::Quantity;
use serde::{Deserialize, Serialize};

/// Effort and capacity for one month
///
/// Status is always derived from the two amounts, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationCell {
    /// Workload contributed in the month
    pub effort: Quantity,
    /// Ceiling the owner can absorb (authoritative on roots only)
    pub capacity: Quantity,
}

impl AllocationCell {
    /// Create a cell
    #[inline]
    #[must_use]
    pub fn new(effort: Quantity, capacity: Quantity) -> Self {
        Self { effort, capacity }
    }

    /// Derived status
    #[inline]
    #[must_use]
    pub fn status(&self) -> CellStatus {
        CellStatus::classify(self.effort, self.capacity)
    }
}

/// Load state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    /// Effort equals capacity
    Optimal,
    /// Effort exceeds capacity
    Over,
    /// Effort below capacity
    Under,
    /// No effort
    Empty,
}

impl CellStatus {
    /// Classify an effort against a capacity
    #[must_use]
    pub fn classify(effort: Quantity, capacity: Quantity) -> Self {
        if effort.is_zero() {
            Self::Empty
        } else if effort.approx_eq(capacity) {
            Self::Optimal
        } else if effort > capacity {
            Self::Over
        } else {
            Self::Under
        }
    }
}
