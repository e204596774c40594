//! View queries and expansion state

use crate::filter::{Filter, FilterSet};
use crate::utilization::UtilizationThresholds;
use capgrid_model::{MonthLabel, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Attribute a field grouping partitions parents by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    Department,
    Manager,
    Status,
}

impl GroupField {
    /// Label used in group keys
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Manager => "manager",
            Self::Status => "status",
        }
    }
}

/// How top-level parents are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    #[default]
    None,
    Field(GroupField),
    /// Each top-level node becomes a group over its children
    Hierarchy,
}

/// Which nodes are expanded and which groups are collapsed
///
/// Nodes start collapsed; groups start expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<NodeId>,
    collapsed_groups: HashSet<String>,
}

impl ExpansionState {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a node's children are shown
    #[inline]
    #[must_use]
    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    /// Whether a group's members are hidden
    #[inline]
    #[must_use]
    pub fn is_collapsed(&self, group_key: &str) -> bool {
        self.collapsed_groups.contains(group_key)
    }

    /// Flip a node; returns whether it is now expanded
    pub fn toggle_node(&mut self, id: &NodeId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    /// Flip a group; returns whether it is now collapsed
    pub fn toggle_group(&mut self, group_key: &str) -> bool {
        if self.collapsed_groups.remove(group_key) {
            false
        } else {
            self.collapsed_groups.insert(group_key.to_string());
            true
        }
    }

    /// Expand a node
    #[must_use]
    pub fn with_expanded(mut self, id: NodeId) -> Self {
        self.expanded.insert(id);
        self
    }

    /// Collapse a group
    #[must_use]
    pub fn with_collapsed_group(mut self, group_key: impl Into<String>) -> Self {
        self.collapsed_groups.insert(group_key.into());
        self
    }
}

/// Materializer tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub thresholds: UtilizationThresholds,
    /// Leading visible months used for group averages
    pub group_window: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            thresholds: UtilizationThresholds::default(),
            group_window: 6,
        }
    }
}

/// Everything one materialization pass needs besides the forest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    pub months: Vec<MonthLabel>,
    pub filters: FilterSet,
    pub group_by: GroupBy,
    pub expansion: ExpansionState,
    pub settings: ViewSettings,
}

impl ViewQuery {
    /// Ungrouped, unfiltered query over `months`
    #[must_use]
    pub fn new(months: impl Into<Vec<MonthLabel>>) -> Self {
        Self {
            months: months.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_expansion(mut self, expansion: ExpansionState) -> Self {
        self.expansion = expansion;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: ViewSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Leading months used for group averages
    #[must_use]
    pub fn group_window(&self) -> &[MonthLabel] {
        &self.months[..self.settings.group_window.min(self.months.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_state() {
        let mut state = ExpansionState::new();
        let id = NodeId::root("e1").unwrap();
        assert!(!state.is_expanded(&id));
        assert!(state.toggle_node(&id));
        assert!(state.is_expanded(&id));
        assert!(!state.toggle_node(&id));

        assert!(!state.is_collapsed("g"));
        assert!(state.toggle_group("g"));
        assert!(state.is_collapsed("g"));
    }

    #[test]
    fn group_window_clamps() {
        let months: Vec<MonthLabel> = ["Jan", "Feb", "Mar"].into_iter().map(MonthLabel::new).collect();
        assert_eq!(ViewQuery::new(months).group_window().len(), 3);
    }

    #[test]
    fn group_by_deserializes() {
        let by: GroupBy = serde_json::from_str(r#"{"field":"department"}"#).unwrap();
        assert_eq!(by, GroupBy::Field(GroupField::Department));
    }
}
