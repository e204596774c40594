//! Utilization averages and capacity buckets
//!
//! Only months with capacity > 0 count toward an average; a node with no
//! such month is 0% utilized.

use capgrid_model::{MonthLabel, ResourceNode};
use serde::{Deserialize, Serialize};

/// Percent boundaries between capacity buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationThresholds {
    /// At or below this is `Available`
    pub balanced: f64,
    /// Above this is `Overbooked`
    pub over: f64,
}

impl Default for UtilizationThresholds {
    fn default() -> Self {
        Self {
            balanced: 80.0,
            over: 100.0,
        }
    }
}

/// Utilization band used by the capacity filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityBucket {
    Available,
    Warning,
    Overbooked,
}

impl CapacityBucket {
    /// Every bucket, lowest first
    pub const ALL: [CapacityBucket; 3] = [Self::Available, Self::Warning, Self::Overbooked];

    /// Bucket for a utilization percent
    #[must_use]
    pub fn classify(percent: f64, thresholds: &UtilizationThresholds) -> Self {
        if percent <= thresholds.balanced {
            Self::Available
        } else if percent <= thresholds.over {
            Self::Warning
        } else {
            Self::Overbooked
        }
    }
}

/// Mean of `effort / capacity × 100` over months with capacity > 0
#[must_use]
pub fn average_utilization(node: &ResourceNode, months: &[MonthLabel]) -> f64 {
    let (sum, count) = months
        .iter()
        .filter_map(|m| node.cell(m))
        .filter(|cell| !cell.capacity.is_zero())
        .fold((0.0, 0u32), |(sum, count), cell| {
            (sum + cell.effort.get() / cell.capacity.get() * 100.0, count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// Group utilization percent over a window of months
///
/// `Σ(effort / capacity)` across every member and window month with
/// capacity > 0, divided by the number of such (member, month) pairs.
#[must_use]
pub fn window_utilization<'a>(
    members: impl IntoIterator<Item = &'a ResourceNode>,
    window: &[MonthLabel],
) -> f64 {
    let (sum, count) = members
        .into_iter()
        .flat_map(|node| window.iter().filter_map(|m| node.cell(m)))
        .filter(|cell| !cell.capacity.is_zero())
        .fold((0.0, 0u32), |(sum, count), cell| {
            (sum + cell.effort.get() / cell.capacity.get(), count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capgrid_model::{AllocationCell, EntityId, NodeId, NodeKind, Quantity};
    use proptest::prelude::*;

    fn node(cells: &[(&str, f64, f64)]) -> ResourceNode {
        cells.iter().fold(
            ResourceNode::new(
                NodeId::Root(EntityId::new("e1").unwrap()),
                "Ada",
                NodeKind::Person,
            ),
            |n, (m, effort, capacity)| {
                n.with_cell(
                    MonthLabel::new(*m),
                    AllocationCell::new(
                        Quantity::new(*effort).unwrap(),
                        Quantity::new(*capacity).unwrap(),
                    ),
                )
            },
        )
    }

    fn months(labels: &[&str]) -> Vec<MonthLabel> {
        labels.iter().map(|m| MonthLabel::new(*m)).collect()
    }

    #[test]
    fn zero_capacity_months_are_ignored() {
        let n = node(&[("Jan", 10.0, 20.0), ("Feb", 5.0, 0.0)]);
        assert!((average_utilization(&n, &months(&["Jan", "Feb", "Mar"])) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn no_capacity_is_zero_percent() {
        let n = node(&[("Jan", 10.0, 0.0)]);
        assert_eq!(average_utilization(&n, &months(&["Jan"])), 0.0);
        assert_eq!(CapacityBucket::classify(0.0, &UtilizationThresholds::default()), CapacityBucket::Available);
    }

    #[test]
    fn bucket_boundaries_are_inclusive_below() {
        let t = UtilizationThresholds::default();
        assert_eq!(CapacityBucket::classify(80.0, &t), CapacityBucket::Available);
        assert_eq!(CapacityBucket::classify(80.5, &t), CapacityBucket::Warning);
        assert_eq!(CapacityBucket::classify(100.0, &t), CapacityBucket::Warning);
        assert_eq!(CapacityBucket::classify(120.0, &t), CapacityBucket::Overbooked);
    }

    #[test]
    fn window_average_spans_members() {
        let a = node(&[("Jan", 10.0, 20.0)]);
        let b = node(&[("Jan", 20.0, 20.0), ("Feb", 0.0, 0.0)]);
        let pct = window_utilization([&a, &b], &months(&["Jan", "Feb"]));
        assert!((pct - 75.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_buckets_partition_percentages(pct in 0.0f64..500.0) {
            let t = UtilizationThresholds::default();
            let bucket = CapacityBucket::classify(pct, &t);
            let matching = CapacityBucket::ALL
                .iter()
                .filter(|b| match b {
                    CapacityBucket::Available => pct <= t.balanced,
                    CapacityBucket::Warning => pct > t.balanced && pct <= t.over,
                    CapacityBucket::Overbooked => pct > t.over,
                })
                .collect::<Vec<_>>();
            prop_assert_eq!(matching, vec![&bucket]);
        }
    }
}
