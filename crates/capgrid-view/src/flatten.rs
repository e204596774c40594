//! Depth-first flattening into rows

use crate::group::{GroupNode, ViewNode};
use crate::query::ViewQuery;
use crate::rollup::rollup;
use crate::row::{ActionRow, GroupHeaderRow, ResourceRow, Row, RowAction, RowContent};
use crate::utilization::{average_utilization, CapacityBucket};
use capgrid_model::{EntityId, NodeKind, ResourceNode};

/// Rows for materialized nodes, depth-first
///
/// A node's children appear only while it is expanded; a group's members
/// appear unless it is collapsed. An expanded top-level work item (or a
/// hierarchy group derived from one) is followed by an add-child action row.
#[must_use]
pub fn flatten(nodes: &[ViewNode], query: &ViewQuery) -> Vec<Row> {
    let mut rows = Vec::new();
    for node in nodes {
        visit(&mut rows, node, 0, None, query);
    }
    rows
}

fn visit(
    rows: &mut Vec<Row>,
    node: &ViewNode,
    depth: usize,
    parent: Option<&EntityId>,
    query: &ViewQuery,
) {
    match node {
        ViewNode::Group(group) => visit_group(rows, group, depth, query),
        ViewNode::Leaf(leaf) => visit_leaf(rows, leaf, depth, parent, query),
    }
}

fn visit_group(rows: &mut Vec<Row>, group: &GroupNode, depth: usize, query: &ViewQuery) {
    let collapsed = query.expansion.is_collapsed(&group.key);
    rows.push(Row {
        depth,
        content: RowContent::GroupHeader(GroupHeaderRow {
            key: group.key.clone(),
            label: group.label.clone(),
            summary: group.summary,
            collapsed,
        }),
    });
    if collapsed {
        return;
    }
    let source = group.source.as_ref().map(|id| id.entity());
    for member in &group.members {
        visit(rows, member, depth + 1, source, query);
    }
    // people under a project root
    if let Some(parent) = source {
        if group.summary.member_kind == NodeKind::Person {
            rows.push(action_row(parent, depth + 1));
        }
    }
}

fn visit_leaf(
    rows: &mut Vec<Row>,
    node: &ResourceNode,
    depth: usize,
    parent: Option<&EntityId>,
    query: &ViewQuery,
) {
    let expanded = query.expansion.is_expanded(&node.id);
    let utilization = average_utilization(node, &query.months);
    let is_root = parent.is_none();
    rows.push(Row {
        depth,
        content: RowContent::Resource(ResourceRow {
            node: node.clone(),
            parent: parent.cloned(),
            is_root,
            has_children: node.has_children(),
            expanded,
            utilization,
            bucket: CapacityBucket::classify(utilization, &query.settings.thresholds),
        }),
    });
    if !expanded {
        return;
    }
    for child in &node.children {
        let rolled = rollup(child, &query.months);
        visit_leaf(rows, &rolled, depth + 1, Some(node.entity()), query);
    }
    if is_root && node.kind == NodeKind::WorkItem {
        rows.push(action_row(node.entity(), depth + 1));
    }
}

fn action_row(parent: &EntityId, depth: usize) -> Row {
    Row {
        depth,
        content: RowContent::Action(ActionRow {
            parent: parent.clone(),
            action: RowAction::AddChild,
        }),
    }
}
