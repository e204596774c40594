//! Parent rollup
//!
//! A parent with children shows, for each visible month, the sum of its
//! children's effort against its own capacity. Rollups are recomputed on
//! every pass and never written back to the store.

use capgrid_model::{AllocationCell, MonthLabel, Quantity, ResourceNode};

/// Copy of `parent` with visible-month cells replaced by child effort totals
///
/// Childless parents are returned unchanged. A month where the parent has
/// no cell and no child has effort stays absent.
#[must_use]
pub fn rollup(parent: &ResourceNode, months: &[MonthLabel]) -> ResourceNode {
    if parent.has_children() {
        sum_children(parent, months)
    } else {
        parent.clone()
    }
}

/// Rollup that also runs when no children are left
///
/// Used for parents whose children were all filtered out, so their cells
/// show a zero total instead of stored effort.
pub(crate) fn sum_children(parent: &ResourceNode, months: &[MonthLabel]) -> ResourceNode {
    let mut rolled = parent.clone();
    for month in months {
        let effort: Quantity = parent.children.iter().map(|c| c.effort(month)).sum();
        if parent.cell(month).is_none() && effort.is_zero() {
            continue;
        }
        rolled
            .allocations
            .insert(month.clone(), AllocationCell::new(effort, parent.capacity(month)));
    }
    rolled
}
