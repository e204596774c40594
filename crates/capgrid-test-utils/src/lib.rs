//! Testing utilities for capgrid workspace
//!
//! Shared fixtures, a mirrored seed builder, and assertions.

#![allow(missing_docs)]

use capgrid_model::{
    AllocationCell, EntityId, MonthLabel, NodeAttributes, NodeKind, NodeTemplate, Quantity,
    ResourceNode,
};
use capgrid_store::{mirror_divergences, SeedForests, TreeStore};
use tracing_subscriber::EnvFilter;

pub fn eid(id: &str) -> EntityId {
    EntityId::new(id).unwrap()
}

pub fn q(value: f64) -> Quantity {
    Quantity::new(value).unwrap()
}

pub fn month(label: &str) -> MonthLabel {
    MonthLabel::new(label)
}

pub fn months(labels: &[&str]) -> Vec<MonthLabel> {
    labels.iter().map(|m| MonthLabel::new(*m)).collect()
}

pub fn person(id: &str, name: &str) -> NodeTemplate {
    NodeTemplate::new(eid(id), name, NodeKind::Person)
}

pub fn project(id: &str, name: &str) -> NodeTemplate {
    NodeTemplate::new(eid(id), name, NodeKind::WorkItem)
}

/// Attributes with only a department set
pub fn in_department(department: &str) -> NodeAttributes {
    NodeAttributes {
        department: Some(department.to_string()),
        ..NodeAttributes::default()
    }
}

/// Install a test subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Panic with every divergence if the two forests disagree
pub fn assert_mirrored(store: &TreeStore) {
    let divergences = mirror_divergences(store);
    assert!(
        divergences.is_empty(),
        "forests are not mirrored: {divergences:#?}"
    );
}

/// Builds a seed whose assignments are written into both forests
#[derive(Debug, Default)]
pub struct SeedBuilder {
    people: Vec<ResourceNode>,
    projects: Vec<ResourceNode>,
}

impl SeedBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person(self, id: &str, name: &str) -> Self {
        self.person_with(person(id, name))
    }

    pub fn person_with(mut self, template: NodeTemplate) -> Self {
        self.people.push(template.to_root());
        self
    }

    pub fn project(self, id: &str, name: &str) -> Self {
        self.project_with(project(id, name))
    }

    pub fn project_with(mut self, template: NodeTemplate) -> Self {
        self.projects.push(template.to_root());
        self
    }

    /// Root capacity for one month, in whichever forest holds the root
    pub fn capacity(mut self, root: &str, label: &str, capacity: f64) -> Self {
        let id = eid(root);
        let node = self
            .people
            .iter_mut()
            .chain(self.projects.iter_mut())
            .find(|n| n.entity() == &id)
            .unwrap_or_else(|| panic!("no root '{root}'"));
        node.set_capacity(month(label), q(capacity));
        self
    }

    /// Mirrored assignment of `work_item` to `person_id` with per-month effort
    pub fn assign(mut self, person_id: &str, work_item: &str, efforts: &[(&str, f64)]) -> Self {
        let (p, w) = (eid(person_id), eid(work_item));
        let person_template = template_of(&self.people, &p);
        let item_template = template_of(&self.projects, &w);
        attach(&mut self.people, &p, &item_template, efforts);
        attach(&mut self.projects, &w, &person_template, efforts);
        self
    }

    pub fn seed(self) -> SeedForests {
        SeedForests {
            people: self.people,
            projects: self.projects,
        }
    }

    pub fn build(self) -> TreeStore {
        TreeStore::from_seed(self.seed()).unwrap()
    }
}

fn template_of(roots: &[ResourceNode], id: &EntityId) -> NodeTemplate {
    roots
        .iter()
        .find(|n| n.entity() == id)
        .map(NodeTemplate::from_node)
        .unwrap_or_else(|| panic!("no root '{id}'"))
}

fn attach(
    roots: &mut [ResourceNode],
    parent: &EntityId,
    child: &NodeTemplate,
    efforts: &[(&str, f64)],
) {
    let root = roots
        .iter_mut()
        .find(|n| n.entity() == parent)
        .unwrap_or_else(|| panic!("no root '{parent}'"));
    let position = match root.child_position(&child.id) {
        Some(position) => position,
        None => {
            root.children.push_back(child.to_child(parent));
            root.children.len() - 1
        }
    };
    for (label, effort) in efforts {
        if root.cell(&month(label)).is_none() {
            root.set_capacity(month(label), Quantity::DEFAULT_CAPACITY);
        }
        if let Some(copy) = root.children.get_mut(position) {
            copy.allocations.insert(
                month(label),
                AllocationCell::new(q(*effort), Quantity::DEFAULT_CAPACITY),
            );
        }
    }
}
