//! The dual-forest tree store

use crate::error::StoreError;
use crate::forest::{Forest, ForestKind};
use capgrid_model::{NodeId, ResourceNode};
use serde::{Deserialize, Serialize};

/// Seed input: both forests as plain node lists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedForests {
    #[serde(default)]
    pub people: Vec<ResourceNode>,
    #[serde(default)]
    pub projects: Vec<ResourceNode>,
}

impl SeedForests {
    /// Decode a `{ "people": [...], "projects": [...] }` document
    ///
    /// # Errors
    /// Returns error if the JSON does not match the node shape
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Sole source of truth for assignment facts
///
/// Holds the People forest and the Projects forest. Reads are free; every
/// write goes through [`AllocationMutator`](crate::AllocationMutator).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStore {
    people: Forest,
    projects: Forest,
}

impl TreeStore {
    /// Store with two empty forests
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            people: Forest::new(ForestKind::People),
            projects: Forest::new(ForestKind::Projects),
        }
    }

    /// Build both forests from seed input
    ///
    /// # Errors
    /// Returns error if either forest fails seed validation
    pub fn from_seed(seed: SeedForests) -> Result<Self, StoreError> {
        let people = Forest::from_roots(ForestKind::People, seed.people)?;
        let projects = Forest::from_roots(ForestKind::Projects, seed.projects)?;
        tracing::info!(
            people = people.len(),
            projects = projects.len(),
            "tree store initialised"
        );
        Ok(Self { people, projects })
    }

    /// One forest
    #[inline]
    #[must_use]
    pub fn forest(&self, kind: ForestKind) -> &Forest {
        match kind {
            ForestKind::People => &self.people,
            ForestKind::Projects => &self.projects,
        }
    }

    pub(crate) fn forest_mut(&mut self, kind: ForestKind) -> &mut Forest {
        match kind {
            ForestKind::People => &mut self.people,
            ForestKind::Projects => &mut self.projects,
        }
    }

    /// The People forest
    #[inline]
    #[must_use]
    pub fn people(&self) -> &Forest {
        &self.people
    }

    /// The Projects forest
    #[inline]
    #[must_use]
    pub fn projects(&self) -> &Forest {
        &self.projects
    }

    /// Lookup in one forest
    #[inline]
    #[must_use]
    pub fn find_node(&self, kind: ForestKind, id: &NodeId) -> Option<&ResourceNode> {
        self.forest(kind).find_node(id)
    }

    /// Parent lookup in one forest
    #[inline]
    #[must_use]
    pub fn find_parent_id(&self, kind: ForestKind, child: &NodeId) -> Option<NodeId> {
        self.forest(kind).find_parent_id(child)
    }

    /// O(1) copy sharing structure with the live store
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"{
        "people": [
            { "id": "e1", "displayName": "Ada", "kind": "person", "department": "Eng",
              "allocations": { "Jan": { "effort": 5.0, "capacity": 20.0 } },
              "children": [
                { "id": "p1::e1", "displayName": "Atlas", "kind": "workItem",
                  "allocations": { "Jan": { "effort": 5.0, "capacity": 20.0 } } }
              ] }
        ],
        "projects": [
            { "id": "p1", "displayName": "Atlas", "kind": "workItem",
              "children": [
                { "id": "e1::p1", "displayName": "Ada", "kind": "person",
                  "allocations": { "Jan": { "effort": 5.0, "capacity": 20.0 } } }
              ] }
        ]
    }"#;

    #[test]
    fn seed_from_json() {
        let store = TreeStore::from_seed(SeedForests::from_json_str(SEED).unwrap()).unwrap();
        assert_eq!(store.people().len(), 1);
        let child = store
            .find_node(ForestKind::Projects, &"e1::p1".parse().unwrap())
            .unwrap();
        assert_eq!(child.display_name, "Ada");
        assert_eq!(
            store.find_parent_id(ForestKind::People, &"p1::e1".parse().unwrap()),
            Some("e1".parse().unwrap())
        );
    }

    #[test]
    fn malformed_seed_is_rejected() {
        let result = SeedForests::from_json_str(r#"{ "people": [ { "id": "" } ] }"#);
        assert!(matches!(result, Err(StoreError::Seed(_))));
    }

    #[test]
    fn empty_store_has_empty_forests() {
        let store = TreeStore::default();
        assert!(store.people().is_empty());
        assert!(store.projects().is_empty());
        assert_eq!(store.forest(ForestKind::People).kind(), ForestKind::People);
    }
}
