//! Child filters
//!
//! Filters apply to the children of each top-level parent. Active filters
//! are ANDed; a filter with an empty value set passes everything.

use crate::utilization::{average_utilization, CapacityBucket, UtilizationThresholds};
use capgrid_model::{MonthLabel, ResourceNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Single-valued attribute a field filter matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Status,
    Department,
    Manager,
    /// Display name
    Name,
}

impl FilterField {
    /// Value of this field, falling back to the parent's when the node has none
    #[must_use]
    pub fn value<'a>(self, node: &'a ResourceNode, parent: &'a ResourceNode) -> Option<&'a str> {
        let own = |n: &'a ResourceNode| match self {
            Self::Status => n.attributes.status.as_deref(),
            Self::Department => n.attributes.department.as_deref(),
            Self::Manager => n.attributes.manager.as_deref(),
            Self::Name => Some(n.display_name.as_str()),
        };
        own(node).or_else(|| own(parent))
    }
}

/// One active filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Filter {
    /// Exact match against any listed value
    Field {
        field: FilterField,
        values: BTreeSet<String>,
    },
    /// Every listed skill must be present
    Skills { required: BTreeSet<String> },
    /// Average utilization over visible months falls in one of the buckets
    CapacityBucket { buckets: BTreeSet<CapacityBucket> },
}

impl Filter {
    /// Field filter from any iterable of values
    #[must_use]
    pub fn field<I, S>(field: FilterField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Field {
            field,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Skills filter
    #[must_use]
    pub fn skills<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Skills {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// Capacity-bucket filter
    #[must_use]
    pub fn buckets(buckets: impl IntoIterator<Item = CapacityBucket>) -> Self {
        Self::CapacityBucket {
            buckets: buckets.into_iter().collect(),
        }
    }

    /// Whether the filter passes everything
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Self::Field { values, .. } => values.is_empty(),
            Self::Skills { required } => required.is_empty(),
            Self::CapacityBucket { buckets } => buckets.is_empty(),
        }
    }

    fn passes(&self, child: &ResourceNode, parent: &ResourceNode, ctx: &FilterContext<'_>) -> bool {
        match self {
            Self::Field { field, values } => field
                .value(child, parent)
                .is_some_and(|v| values.contains(v)),
            Self::Skills { required } => {
                let skills = if child.attributes.skills.is_empty() {
                    &parent.attributes.skills
                } else {
                    &child.attributes.skills
                };
                required.iter().all(|r| skills.contains(r))
            }
            Self::CapacityBucket { buckets } => {
                let pct = average_utilization(child, ctx.months);
                buckets.contains(&CapacityBucket::classify(pct, ctx.thresholds))
            }
        }
    }
}

/// Active filters, ANDed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With one more filter
    #[inline]
    #[must_use]
    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter
    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Active filters
    #[inline]
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Whether every filter is a no-op
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.filters.iter().all(Filter::is_noop)
    }

    /// Whether `child` of `parent` passes every active filter
    #[must_use]
    pub fn accepts(
        &self,
        child: &ResourceNode,
        parent: &ResourceNode,
        months: &[MonthLabel],
        thresholds: &UtilizationThresholds,
    ) -> bool {
        let ctx = FilterContext { months, thresholds };
        self.filters
            .iter()
            .filter(|f| !f.is_noop())
            .all(|f| f.passes(child, parent, &ctx))
    }

    /// Copy of `parent` with only the children that pass
    #[must_use]
    pub fn apply(
        &self,
        parent: &ResourceNode,
        months: &[MonthLabel],
        thresholds: &UtilizationThresholds,
    ) -> ResourceNode {
        if self.is_noop() {
            return parent.clone();
        }
        let mut kept = parent.clone();
        kept.children = parent
            .children
            .iter()
            .filter(|c| self.accepts(c, parent, months, thresholds))
            .cloned()
            .collect();
        kept
    }
}

struct FilterContext<'a> {
    months: &'a [MonthLabel],
    thresholds: &'a UtilizationThresholds,
}
