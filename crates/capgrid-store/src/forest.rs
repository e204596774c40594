//! Indexed persistent forests
//!
//! A [`Forest`] is an ordered list of roots, each with assignment children.
//! A lookup index maps root ids and normalized `entity::parent` ids to the
//! node's position, so mutation targets never need prefix-matching.

use crate::error::StoreError;
use capgrid_model::{AssignmentId, EntityId, NodeId, NodeKind, ResourceNode};
use im::{HashMap, Vector};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt::{self, Display, Formatter};

/// Position of an indexed node: `[root]` or `[root, child]`
pub(crate) type NodePath = SmallVec<[usize; 2]>;

/// Which of the two mirrored forests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForestKind {
    /// Person → assigned work items
    People,
    /// Work item → assigned people
    Projects,
}

impl ForestKind {
    /// Both forests, People first
    pub const ALL: [ForestKind; 2] = [ForestKind::People, ForestKind::Projects];

    /// Kind every root of this forest must have
    #[inline]
    #[must_use]
    pub fn root_kind(self) -> NodeKind {
        match self {
            Self::People => NodeKind::Person,
            Self::Projects => NodeKind::WorkItem,
        }
    }

    /// The mirror forest
    #[inline]
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::People => Self::Projects,
            Self::Projects => Self::People,
        }
    }
}

impl Display for ForestKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::People => f.write_str("people"),
            Self::Projects => f.write_str("projects"),
        }
    }
}

/// One rooted forest
///
/// Cloning is O(1); writes through the crate-private mutators copy only the
/// path from the root to the changed node.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    kind: ForestKind,
    roots: Vector<ResourceNode>,
    index: HashMap<NodeId, NodePath>,
}

impl Forest {
    /// Empty forest
    #[inline]
    #[must_use]
    pub fn new(kind: ForestKind) -> Self {
        Self {
            kind,
            roots: Vector::new(),
            index: HashMap::new(),
        }
    }

    /// Build from seed roots
    ///
    /// # Errors
    /// Returns error if a root has a composite id or the wrong kind, if a
    /// root repeats, or if an entity is attached twice under one root
    pub fn from_roots(
        kind: ForestKind,
        roots: impl IntoIterator<Item = ResourceNode>,
    ) -> Result<Self, StoreError> {
        let mut forest = Self::new(kind);
        for root in roots {
            let NodeId::Root(entity) = &root.id else {
                return Err(StoreError::AssignmentAtRoot {
                    forest: kind,
                    id: root.id.clone(),
                });
            };
            if root.kind != kind.root_kind() {
                return Err(StoreError::WrongRootKind {
                    forest: kind,
                    id: entity.clone(),
                    kind: root.kind,
                });
            }
            if forest.root(entity).is_some() {
                return Err(StoreError::DuplicateRoot {
                    forest: kind,
                    id: entity.clone(),
                });
            }
            for (i, child) in root.children.iter().enumerate() {
                if root.children.iter().take(i).any(|c| c.entity() == child.entity()) {
                    return Err(StoreError::DuplicateAssignment {
                        forest: kind,
                        parent: entity.clone(),
                        entity: child.entity().clone(),
                    });
                }
            }
            forest.push_root(root);
        }
        Ok(forest)
    }

    /// Which forest this is
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ForestKind {
        self.kind
    }

    /// Roots in display order
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &Vector<ResourceNode> {
        &self.roots
    }

    /// Number of roots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether there are no roots
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Root standing for `entity`
    #[must_use]
    pub fn root(&self, entity: &EntityId) -> Option<&ResourceNode> {
        self.find_node(&NodeId::Root(entity.clone()))
    }

    /// Assignment of `entity` under root `parent`
    #[must_use]
    pub fn assignment(&self, parent: &EntityId, entity: &EntityId) -> Option<&ResourceNode> {
        let key = NodeId::assignment(entity.clone(), parent.clone());
        self.index.get(&key).and_then(|path| self.node_at(path))
    }

    /// Lookup by typed id
    ///
    /// Roots and assignment children resolve through the index; deeper
    /// nodes fall back to a depth-first search.
    #[must_use]
    pub fn find_node(&self, id: &NodeId) -> Option<&ResourceNode> {
        if let Some(path) = self.index.get(id) {
            return self.node_at(path);
        }
        depth_first(&self.roots, &|n| &n.id == id)
    }

    /// Lookup by raw id
    ///
    /// A composite id (`entity::parent`) is matched exactly. A bare id
    /// matches the first node in depth-first order whose id is `id` or
    /// `id::*`. Malformed ids resolve to `None`.
    #[must_use]
    pub fn find_by_str(&self, raw: &str) -> Option<&ResourceNode> {
        match raw.parse::<NodeId>().ok()? {
            NodeId::Root(entity) => depth_first(&self.roots, &|n| n.id.matches_entity(&entity)),
            id @ NodeId::Assignment(_) => self.find_node(&id),
        }
    }

    /// Id of the node's parent (`None` for roots and unknown ids)
    #[must_use]
    pub fn find_parent_id(&self, child: &NodeId) -> Option<NodeId> {
        if let Some(path) = self.index.get(child) {
            return match path.as_slice() {
                [root, _] => self.roots.get(*root).map(|r| r.id.clone()),
                _ => None,
            };
        }
        parent_depth_first(&self.roots, child).map(|p| p.id.clone())
    }

    /// Every (root, assignment child) pair in display order
    pub fn assignments(&self) -> impl Iterator<Item = (&ResourceNode, &ResourceNode)> {
        self.roots
            .iter()
            .flat_map(|root| root.children.iter().map(move |child| (root, child)))
    }

    fn node_at(&self, path: &[usize]) -> Option<&ResourceNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for i in rest {
            node = node.children.get(*i)?;
        }
        Some(node)
    }

    pub(crate) fn root_mut(&mut self, entity: &EntityId) -> Option<&mut ResourceNode> {
        let position = *self.index.get(&NodeId::Root(entity.clone()))?.first()?;
        self.roots.get_mut(position)
    }

    pub(crate) fn assignment_mut(
        &mut self,
        parent: &EntityId,
        entity: &EntityId,
    ) -> Option<&mut ResourceNode> {
        let key = NodeId::assignment(entity.clone(), parent.clone());
        let (root, child) = match self.index.get(&key)?.as_slice() {
            [root, child] => (*root, *child),
            _ => return None,
        };
        self.roots.get_mut(root)?.children.get_mut(child)
    }

    /// Append a root (and index its children)
    pub(crate) fn push_root(&mut self, root: ResourceNode) {
        let position = self.roots.len();
        self.index.insert(root.id.clone(), smallvec![position]);
        for (c, child) in root.children.iter().enumerate() {
            self.index
                .insert(child_key(root.entity(), child), smallvec![position, c]);
        }
        self.roots.push_back(root);
    }

    /// Append a child under root `parent`; returns false if the root is absent
    pub(crate) fn push_child(&mut self, parent: &EntityId, child: ResourceNode) -> bool {
        let key = child_key(parent, &child);
        let Some(position) = self
            .index
            .get(&NodeId::Root(parent.clone()))
            .and_then(|p| p.first().copied())
        else {
            return false;
        };
        let Some(root) = self.roots.get_mut(position) else {
            return false;
        };
        let c = root.children.len();
        root.children.push_back(child);
        self.index.insert(key, smallvec![position, c]);
        true
    }

    /// Splice the assignment of `entity` out of root `parent`
    pub(crate) fn remove_child(
        &mut self,
        parent: &EntityId,
        entity: &EntityId,
    ) -> Option<ResourceNode> {
        let key = NodeId::assignment(entity.clone(), parent.clone());
        let (position, c) = match self.index.get(&key)?.as_slice() {
            [root, child] => (*root, *child),
            _ => return None,
        };
        let root = self.roots.get_mut(position)?;
        let removed = root.children.remove(c);
        self.index.remove(&key);
        // later siblings shift left by one
        let shifted: Vec<NodeId> = root
            .children
            .iter()
            .skip(c)
            .map(|sibling| child_key(parent, sibling))
            .collect();
        for (offset, sibling) in shifted.into_iter().enumerate() {
            self.index.insert(sibling, smallvec![position, c + offset]);
        }
        Some(removed)
    }
}

fn child_key(parent: &EntityId, child: &ResourceNode) -> NodeId {
    NodeId::Assignment(AssignmentId::new(child.entity().clone(), parent.clone()))
}

fn depth_first<'a>(
    nodes: &'a Vector<ResourceNode>,
    pred: &dyn Fn(&ResourceNode) -> bool,
) -> Option<&'a ResourceNode> {
    for node in nodes {
        if pred(node) {
            return Some(node);
        }
        if let Some(found) = depth_first(&node.children, pred) {
            return Some(found);
        }
    }
    None
}

fn parent_depth_first<'a>(
    nodes: &'a Vector<ResourceNode>,
    child: &NodeId,
) -> Option<&'a ResourceNode> {
    for node in nodes {
        if node.children.iter().any(|c| &c.id == child) {
            return Some(node);
        }
        if let Some(found) = parent_depth_first(&node.children, child) {
            return Some(found);
        }
    }
    None
}
