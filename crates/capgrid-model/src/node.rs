//! Resource nodes of the authoritative forests
//!
//! A [`ResourceNode`] is a person or a work item. Roots carry capacity; their
//! children are assignment copies that carry effort. Collections are
//! persistent (`im`), so cloning a node shares structure with the original
//! and a write copies only the touched path.

use crate::cell::AllocationCell;
use crate::id::{EntityId, NodeId};
use crate::month::MonthLabel;
use crate::quantity::Quantity;
use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

/// Month-to-cell allocation map
pub type Allocations = OrdMap<MonthLabel, AllocationCell>;

/// What a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// A person who can be assigned
    Person,
    /// A project or other work item people are assigned to
    WorkItem,
}

impl NodeKind {
    /// Singular and plural nouns used in summaries
    #[inline]
    #[must_use]
    pub fn nouns(self) -> (&'static str, &'static str) {
        match self {
            Self::Person => ("person", "people"),
            Self::WorkItem => ("project", "projects"),
        }
    }
}

/// Descriptive fields used by filters and grouping
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Role on an assignment, stamped onto both mirrored copies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Node of a People or Projects forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    pub id: NodeId,
    pub display_name: String,
    pub kind: NodeKind,
    #[serde(flatten)]
    pub attributes: NodeAttributes,
    #[serde(default)]
    pub allocations: Allocations,
    #[serde(default)]
    pub children: Vector<ResourceNode>,
}

impl ResourceNode {
    /// Create a childless node with no allocations
    #[must_use]
    pub fn new(id: NodeId, display_name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            kind,
            attributes: NodeAttributes::default(),
            allocations: OrdMap::new(),
            children: Vector::new(),
        }
    }

    /// With attributes
    #[inline]
    #[must_use]
    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// With one allocation cell
    #[inline]
    #[must_use]
    pub fn with_cell(mut self, month: MonthLabel, cell: AllocationCell) -> Self {
        self.allocations.insert(month, cell);
        self
    }

    /// With one child appended
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: ResourceNode) -> Self {
        self.children.push_back(child);
        self
    }

    /// Entity this node stands for
    #[inline]
    #[must_use]
    pub fn entity(&self) -> &EntityId {
        self.id.entity()
    }

    /// Cell for a month
    #[inline]
    #[must_use]
    pub fn cell(&self, month: &MonthLabel) -> Option<&AllocationCell> {
        self.allocations.get(month)
    }

    /// Effort for a month (zero if absent)
    #[inline]
    #[must_use]
    pub fn effort(&self, month: &MonthLabel) -> Quantity {
        self.cell(month).map_or(Quantity::ZERO, |c| c.effort)
    }

    /// Capacity for a month (zero if absent)
    #[inline]
    #[must_use]
    pub fn capacity(&self, month: &MonthLabel) -> Quantity {
        self.cell(month).map_or(Quantity::ZERO, |c| c.capacity)
    }

    /// Overwrite effort, creating the cell with `default_capacity` if absent
    pub fn set_effort(&mut self, month: MonthLabel, effort: Quantity, default_capacity: Quantity) {
        match self.allocations.get_mut(&month) {
            Some(cell) => cell.effort = effort,
            None => {
                self.allocations
                    .insert(month, AllocationCell::new(effort, default_capacity));
            }
        }
    }

    /// Overwrite capacity, creating an effortless cell if absent
    pub fn set_capacity(&mut self, month: MonthLabel, capacity: Quantity) {
        match self.allocations.get_mut(&month) {
            Some(cell) => cell.capacity = capacity,
            None => {
                self.allocations
                    .insert(month, AllocationCell::new(Quantity::ZERO, capacity));
            }
        }
    }

    /// Remove a month, returning whether it was present
    pub fn remove_month(&mut self, month: &MonthLabel) -> bool {
        self.allocations.remove(month).is_some()
    }

    /// Position of the child standing for `entity`
    ///
    /// Matches exact `entity` ids as well as any `entity::*` composite.
    #[must_use]
    pub fn child_position(&self, entity: &EntityId) -> Option<usize> {
        self.children.iter().position(|c| c.id.matches_entity(entity))
    }

    /// Whether the node has children
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Descriptive shape of an entity, used to synthesize roots and copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplate {
    pub id: EntityId,
    pub display_name: String,
    pub kind: NodeKind,
    #[serde(flatten)]
    pub attributes: NodeAttributes,
}

impl NodeTemplate {
    /// Create a template
    #[must_use]
    pub fn new(id: EntityId, display_name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            kind,
            attributes: NodeAttributes::default(),
        }
    }

    /// With attributes
    #[inline]
    #[must_use]
    pub fn with_attributes(mut self, attributes: NodeAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Template describing an existing node (allocations and children dropped)
    ///
    /// The assignment role is not carried over.
    #[must_use]
    pub fn from_node(node: &ResourceNode) -> Self {
        let mut attributes = node.attributes.clone();
        attributes.role = None;
        Self {
            id: node.entity().clone(),
            display_name: node.display_name.clone(),
            kind: node.kind,
            attributes,
        }
    }

    /// Empty root node
    #[must_use]
    pub fn to_root(&self) -> ResourceNode {
        ResourceNode::new(NodeId::Root(self.id.clone()), &self.display_name, self.kind)
            .with_attributes(self.attributes.clone())
    }

    /// Empty assignment copy attached under `parent`
    #[must_use]
    pub fn to_child(&self, parent: &EntityId) -> ResourceNode {
        ResourceNode::new(
            NodeId::assignment(self.id.clone(), parent.clone()),
            &self.display_name,
            self.kind,
        )
        .with_attributes(self.attributes.clone())
    }
}
