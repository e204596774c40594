//! Entity and node identifiers
//!
//! Provides [`EntityId`] for people and work items, [`AssignmentId`] for the
//! composite `entity::parent` identity of a mirrored assignment, and
//! [`NodeId`] which is either of the two.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between the entity and parent halves of a composite id
pub const ASSIGNMENT_SEPARATOR: &str = "::";

/// Identifier of a person or a work item
///
/// Never empty and never contains [`ASSIGNMENT_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Create a validated entity id
    ///
    /// # Errors
    /// Returns error if the id is empty or contains the separator
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdError::Empty);
        }
        if id.contains(ASSIGNMENT_SEPARATOR) {
            return Err(IdError::ContainsSeparator(id));
        }
        Ok(Self(id))
    }

    /// Borrow the raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

/// Composite identity of one assignment fact attached under one parent
///
/// The same fact appears as `W::P` under person `P` in the People forest and
/// as `P::W` under work item `W` in the Projects forest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssignmentId {
    /// The attached entity (the child)
    pub entity: EntityId,
    /// The root the entity is attached under
    pub parent: EntityId,
}

impl AssignmentId {
    /// Create a composite id
    #[inline]
    #[must_use]
    pub fn new(entity: EntityId, parent: EntityId) -> Self {
        Self { entity, parent }
    }

    /// The id of the same fact as seen from the other forest
    #[inline]
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            entity: self.parent.clone(),
            parent: self.entity.clone(),
        }
    }
}

impl Display for AssignmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ASSIGNMENT_SEPARATOR}{}", self.entity, self.parent)
    }
}

/// Identifier of any node in an authoritative forest
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NodeId {
    /// A top-level person or work item
    Root(EntityId),
    /// An assignment child
    Assignment(AssignmentId),
}

impl NodeId {
    /// Root id from a raw entity id
    ///
    /// # Errors
    /// Returns error if the id is not a valid [`EntityId`]
    pub fn root(id: impl Into<String>) -> Result<Self, IdError> {
        EntityId::new(id).map(Self::Root)
    }

    /// Composite id for `entity` attached under `parent`
    #[inline]
    #[must_use]
    pub fn assignment(entity: EntityId, parent: EntityId) -> Self {
        Self::Assignment(AssignmentId::new(entity, parent))
    }

    /// The entity this node stands for
    #[inline]
    #[must_use]
    pub fn entity(&self) -> &EntityId {
        match self {
            Self::Root(id) => id,
            Self::Assignment(a) => &a.entity,
        }
    }

    /// The parent encoded in a composite id
    #[inline]
    #[must_use]
    pub fn encoded_parent(&self) -> Option<&EntityId> {
        match self {
            Self::Root(_) => None,
            Self::Assignment(a) => Some(&a.parent),
        }
    }

    /// Whether the id names an assignment child
    #[inline]
    #[must_use]
    pub fn is_assignment(&self) -> bool {
        matches!(self, Self::Assignment(_))
    }

    /// Whether this id matches a bare entity lookup (`entity` or `entity::*`)
    #[inline]
    #[must_use]
    pub fn matches_entity(&self, entity: &EntityId) -> bool {
        self.entity() == entity
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root(id) => Display::fmt(id, f),
            Self::Assignment(a) => Display::fmt(a, f),
        }
    }
}

impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(ASSIGNMENT_SEPARATOR) {
            None => NodeId::root(s),
            Some((entity, parent)) => Ok(Self::assignment(
                EntityId::new(entity)?,
                EntityId::new(parent)?,
            )),
        }
    }
}

impl TryFrom<String> for NodeId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.to_string()
    }
}

impl From<EntityId> for NodeId {
    fn from(value: EntityId) -> Self {
        Self::Root(value)
    }
}

impl From<AssignmentId> for NodeId {
    fn from(value: AssignmentId) -> Self {
        Self::Assignment(value)
    }
}

/// Errors related to identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Empty or whitespace-only id
    #[error("id must not be empty")]
    Empty,

    /// Entity id contains the composite separator
    #[error("entity id '{0}' must not contain '::'")]
    ContainsSeparator(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eid(s: &str) -> EntityId {
        EntityId::new(s).unwrap()
    }

    #[test]
    fn entity_id_rejects_empty() {
        assert_eq!(EntityId::new("  "), Err(IdError::Empty));
    }

    #[test]
    fn entity_id_rejects_separator() {
        assert!(matches!(
            EntityId::new("a::b"),
            Err(IdError::ContainsSeparator(_))
        ));
    }

    #[test]
    fn assignment_display_is_entity_then_parent() {
        let id = NodeId::assignment(eid("p9"), eid("e1"));
        assert_eq!(id.to_string(), "p9::e1");
    }

    #[test]
    fn node_id_parses_both_forms() {
        let root: NodeId = "e1".parse().unwrap();
        assert_eq!(root, NodeId::Root(eid("e1")));

        let child: NodeId = "p9::e1".parse().unwrap();
        assert_eq!(child.entity(), &eid("p9"));
        assert_eq!(child.encoded_parent(), Some(&eid("e1")));
    }

    #[test]
    fn node_id_rejects_half_empty_composite() {
        assert_eq!("::e1".parse::<NodeId>(), Err(IdError::Empty));
    }

    #[test]
    fn mirrored_swaps_halves() {
        let a = AssignmentId::new(eid("p9"), eid("e1"));
        assert_eq!(a.mirrored(), AssignmentId::new(eid("e1"), eid("p9")));
    }

    #[test]
    fn matches_entity_covers_prefix_form() {
        let child: NodeId = "p9::e1".parse().unwrap();
        assert!(child.matches_entity(&eid("p9")));
        assert!(!child.matches_entity(&eid("e1")));
    }

    #[test]
    fn node_id_serde_as_string() {
        let id: NodeId = "p9::e1".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p9::e1\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
