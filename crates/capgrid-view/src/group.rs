//! Grouping of rolled-up parents
//!
//! Group nodes exist only in materialized output. They never enter the
//! authoritative forests.

use crate::query::{GroupBy, GroupField, ViewQuery};
use crate::rollup::rollup;
use crate::utilization::window_utilization;
use capgrid_model::{NodeId, NodeKind, ResourceNode};
use indexmap::IndexMap;

/// Bucket for parents missing the grouped attribute
pub const UNASSIGNED: &str = "Unassigned";

/// A materialized tree node
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    Leaf(ResourceNode),
    Group(GroupNode),
}

/// Synthetic grouping node
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    /// Stable key used for collapse state
    pub key: String,
    pub label: String,
    /// Forest root this group was derived from (hierarchy grouping only)
    pub source: Option<NodeId>,
    pub summary: GroupSummary,
    pub members: Vec<ViewNode>,
}

/// Member count and window utilization of a group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSummary {
    pub count: usize,
    /// Percent over the group window
    pub utilization: f64,
    pub member_kind: NodeKind,
}

impl GroupSummary {
    /// Header subtext, e.g. `3 people · 85% avg`
    #[must_use]
    pub fn subtext(&self) -> String {
        let (one, many) = self.member_kind.nouns();
        let noun = if self.count == 1 { one } else { many };
        format!("{} {noun} · {:.0}% avg", self.count, self.utilization)
    }
}

fn field_value(node: &ResourceNode, field: GroupField) -> Option<&str> {
    let value = match field {
        GroupField::Department => node.attributes.department.as_deref(),
        GroupField::Manager => node.attributes.manager.as_deref(),
        GroupField::Status => node.attributes.status.as_deref(),
    };
    value.filter(|v| !v.is_empty())
}

/// Arrange filtered, rolled-up parents per `query.group_by`
///
/// `parent_kind` is the root kind of the forest the parents came from.
/// Grouped output drops parents left with no children.
#[must_use]
pub fn group(parents: Vec<ResourceNode>, parent_kind: NodeKind, query: &ViewQuery) -> Vec<ViewNode> {
    let window = query.group_window();
    match query.group_by {
        GroupBy::None => parents.into_iter().map(ViewNode::Leaf).collect(),
        GroupBy::Field(field) => {
            let mut buckets: IndexMap<String, Vec<ResourceNode>> = IndexMap::new();
            for parent in parents.into_iter().filter(ResourceNode::has_children) {
                let label = field_value(&parent, field).unwrap_or(UNASSIGNED).to_string();
                buckets.entry(label).or_default().push(parent);
            }
            buckets
                .into_iter()
                .map(|(label, members)| {
                    let summary = GroupSummary {
                        count: members.len(),
                        utilization: window_utilization(&members, window),
                        member_kind: parent_kind,
                    };
                    ViewNode::Group(GroupNode {
                        key: format!("{}:{label}", field.as_str()),
                        label,
                        source: None,
                        summary,
                        members: members.into_iter().map(ViewNode::Leaf).collect(),
                    })
                })
                .collect()
        }
        GroupBy::Hierarchy => parents
            .into_iter()
            .filter(ResourceNode::has_children)
            .map(|parent| {
                let members: Vec<ResourceNode> = parent
                    .children
                    .iter()
                    .map(|child| rollup(child, &query.months))
                    .collect();
                let member_kind = members.first().map_or(parent.kind, |m| m.kind);
                ViewNode::Group(GroupNode {
                    key: format!("hierarchy:{}", parent.id),
                    label: parent.display_name.clone(),
                    source: Some(parent.id.clone()),
                    summary: GroupSummary {
                        count: members.len(),
                        utilization: window_utilization(&members, window),
                        member_kind,
                    },
                    members: members.into_iter().map(ViewNode::Leaf).collect(),
                })
            })
            .collect(),
    }
}
