//! Mutation payloads
//!
//! Amounts are [`Quantity`], so payloads can only be built from validated
//! numbers.

use capgrid_model::{EntityId, MonthLabel, NodeId, NodeTemplate, Quantity};
use serde::{Deserialize, Serialize};

/// Whether a save attaches a new item or overwrites an existing assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    /// `resource` is the clicked root; `new_item` is attached under it
    Add,
    /// `resource` is the assignment child; `parent` is its root
    Edit,
}

/// Assignment editor save
#[derive(Debug, Clone, PartialEq)]
pub struct SaveAssignment {
    pub mode: SaveMode,
    pub resource: NodeId,
    pub parent: Option<EntityId>,
    pub months: Vec<MonthLabel>,
    pub effort: Quantity,
    pub new_item: Option<NodeTemplate>,
    pub role: Option<String>,
    /// Overwrite root capacity instead of assignment effort
    pub capacity_edit: bool,
}

impl SaveAssignment {
    /// Attach `new_item` under root `resource`
    #[must_use]
    pub fn add(
        resource: EntityId,
        new_item: NodeTemplate,
        months: Vec<MonthLabel>,
        effort: Quantity,
    ) -> Self {
        Self {
            mode: SaveMode::Add,
            resource: NodeId::Root(resource),
            parent: None,
            months,
            effort,
            new_item: Some(new_item),
            role: None,
            capacity_edit: false,
        }
    }

    /// Overwrite effort of `resource` under root `parent`
    #[must_use]
    pub fn edit(
        resource: EntityId,
        parent: EntityId,
        months: Vec<MonthLabel>,
        effort: Quantity,
    ) -> Self {
        Self {
            mode: SaveMode::Edit,
            resource: NodeId::Root(resource),
            parent: Some(parent),
            months,
            effort,
            new_item: None,
            role: None,
            capacity_edit: false,
        }
    }

    /// Overwrite capacity of root `resource`
    #[must_use]
    pub fn capacity(resource: EntityId, months: Vec<MonthLabel>, capacity: Quantity) -> Self {
        Self {
            mode: SaveMode::Edit,
            resource: NodeId::Root(resource),
            parent: None,
            months,
            effort: capacity,
            new_item: None,
            role: None,
            capacity_edit: true,
        }
    }

    /// With a role stamped onto both copies
    #[inline]
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Removal of months from one assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAllocation {
    pub resource: NodeId,
    pub parent: Option<EntityId>,
    /// Empty means the whole assignment
    pub months: Vec<MonthLabel>,
}

impl DeleteAllocation {
    /// Remove `months` of `resource` under `parent`
    #[must_use]
    pub fn new(resource: EntityId, parent: EntityId, months: Vec<MonthLabel>) -> Self {
        Self {
            resource: NodeId::Root(resource),
            parent: Some(parent),
            months,
        }
    }

    /// Remove one month
    #[must_use]
    pub fn month(resource: EntityId, parent: EntityId, month: MonthLabel) -> Self {
        Self::new(resource, parent, vec![month])
    }

    /// Remove the whole assignment
    #[must_use]
    pub fn unassign(resource: EntityId, parent: EntityId) -> Self {
        Self::new(resource, parent, Vec::new())
    }
}

/// Single-cell save from the inline editor
#[derive(Debug, Clone, PartialEq)]
pub struct InlineSave {
    pub resource: NodeId,
    pub parent: Option<EntityId>,
    pub month: MonthLabel,
    pub value: Quantity,
    pub is_capacity: bool,
}
