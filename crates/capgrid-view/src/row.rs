//! Flattened grid rows

use crate::group::GroupSummary;
use crate::utilization::CapacityBucket;
use capgrid_model::{EntityId, NodeId, ResourceNode};

/// One grid row with its indentation depth
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub depth: usize,
    pub content: RowContent,
}

impl Row {
    #[inline]
    #[must_use]
    pub fn is_group_header(&self) -> bool {
        matches!(self.content, RowContent::GroupHeader(_))
    }

    /// Resource row content, if this is one
    #[inline]
    #[must_use]
    pub fn resource(&self) -> Option<&ResourceRow> {
        match &self.content {
            RowContent::Resource(row) => Some(row),
            _ => None,
        }
    }

    /// Id of the node or group this row stands for
    #[must_use]
    pub fn key(&self) -> String {
        match &self.content {
            RowContent::GroupHeader(header) => header.key.clone(),
            RowContent::Resource(row) => row.node.id.to_string(),
            RowContent::Action(action) => format!("add:{}", action.parent),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowContent {
    GroupHeader(GroupHeaderRow),
    Resource(ResourceRow),
    Action(ActionRow),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupHeaderRow {
    pub key: String,
    pub label: String,
    pub summary: GroupSummary,
    pub collapsed: bool,
}

/// A person or work item row
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRow {
    /// Rolled up when the node has children
    pub node: ResourceNode,
    /// Forest parent (`None` for top-level nodes)
    pub parent: Option<EntityId>,
    pub is_root: bool,
    pub has_children: bool,
    pub expanded: bool,
    /// Average over visible months
    pub utilization: f64,
    pub bucket: CapacityBucket,
}

impl ResourceRow {
    #[inline]
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.node.id
    }
}

/// What a pseudo-row offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    AddChild,
}

/// Pseudo-row offering an action on `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRow {
    pub parent: EntityId,
    pub action: RowAction,
}
