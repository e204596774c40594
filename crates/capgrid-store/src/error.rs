//! Error types for the allocation store
//!
//! - [`StoreError`]: seed input rejected while building the forests
//! - [`ResolutionError`]: why a single (pair, month, forest) write was skipped

use crate::forest::ForestKind;
use capgrid_model::{EntityId, NodeId, NodeKind};

/// Seed validation errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A composite id was supplied as a root
    #[error("{forest} forest: root '{id}' must not be an assignment id")]
    AssignmentAtRoot { forest: ForestKind, id: NodeId },

    /// Root of the wrong kind for its forest
    #[error("{forest} forest: root '{id}' is a {kind:?}")]
    WrongRootKind {
        forest: ForestKind,
        id: EntityId,
        kind: NodeKind,
    },

    /// Root listed twice
    #[error("{forest} forest: duplicate root '{id}'")]
    DuplicateRoot { forest: ForestKind, id: EntityId },

    /// Entity attached twice under one root
    #[error("{forest} forest: '{entity}' attached twice under '{parent}'")]
    DuplicateAssignment {
        forest: ForestKind,
        parent: EntityId,
        entity: EntityId,
    },

    /// Seed JSON could not be decoded
    #[error("invalid seed: {0}")]
    Seed(#[from] serde_json::Error),
}

/// Reasons a write was skipped
///
/// These never surface as `Err`; they are collected in a
/// [`MutationReport`](crate::MutationReport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Entity is neither a root, the supplied template, nor a mirrored copy
    #[error("entity '{0}' could not be resolved")]
    UnknownEntity(EntityId),

    /// Template kind does not fit the forest it would be rooted in
    #[error("template '{id}' is a {actual:?}, expected {expected:?}")]
    TemplateKind {
        id: EntityId,
        expected: NodeKind,
        actual: NodeKind,
    },

    /// Add requested without a template for the new item
    #[error("add requires a template for the new item")]
    MissingTemplate,

    /// Edit or delete target has no parent
    #[error("node '{0}' has no parent")]
    MissingParent(NodeId),

    /// Parent is not a root in either forest
    #[error("parent '{0}' is not a root in either forest")]
    UnknownParent(EntityId),

    /// No assignment (or no cell for the month) to delete
    #[error("no assignment of '{entity}' under '{parent}'")]
    MissingAssignment { parent: EntityId, entity: EntityId },

    /// Capacity edit aimed at an assignment child
    #[error("capacity is root-only, '{0}' is an assignment")]
    CapacityOnAssignment(NodeId),

    /// Capacity target is not a root
    #[error("'{0}' is not a root in either forest")]
    NotARoot(EntityId),
}
