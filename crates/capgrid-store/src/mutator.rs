//! The allocation mutator
//!
//! The only code path that changes assignment facts. Every effort write is
//! applied to both forests: the work item under the person in the People
//! forest, and the person under the work item in the Projects forest.
//! Capacity is root-only and written to whichever forest holds the root.
//!
//! Multi-month batches are sequences of independent single-month writes.
//! A write that cannot be resolved is skipped and recorded in the
//! [`MutationReport`]; nothing already written is rolled back.

use crate::error::ResolutionError;
use crate::forest::ForestKind;
use crate::report::MutationReport;
use crate::request::{DeleteAllocation, InlineSave, SaveAssignment, SaveMode};
use crate::store::TreeStore;
use capgrid_model::{EntityId, MonthLabel, NodeId, NodeKind, NodeTemplate, Quantity, ResourceNode};

/// Mutator settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationSettings {
    /// Capacity of cells created by an effort write
    pub default_capacity: Quantity,
}

impl Default for MutationSettings {
    fn default() -> Self {
        Self {
            default_capacity: Quantity::DEFAULT_CAPACITY,
        }
    }
}

/// The (person, work item) pair one assignment fact is about
#[derive(Debug, Clone, PartialEq, Eq)]
struct AssignmentPair {
    person: EntityId,
    work_item: EntityId,
}

/// Applies mutations to both forests of a [`TreeStore`]
#[derive(Debug)]
pub struct AllocationMutator<'a> {
    store: &'a mut TreeStore,
    settings: MutationSettings,
}

impl<'a> AllocationMutator<'a> {
    /// Mutator with default settings
    #[inline]
    #[must_use]
    pub fn new(store: &'a mut TreeStore) -> Self {
        Self::with_settings(store, MutationSettings::default())
    }

    /// Mutator with explicit settings
    #[inline]
    #[must_use]
    pub fn with_settings(store: &'a mut TreeStore, settings: MutationSettings) -> Self {
        Self { store, settings }
    }

    /// Save from the assignment editor
    ///
    /// With `capacity_edit` the root's capacity is overwritten for each
    /// month. Otherwise the (person, work item) pair is resolved and each
    /// month is upserted into both forests.
    pub fn save_assignment(&mut self, req: &SaveAssignment) -> MutationReport {
        let _span = tracing::debug_span!(
            "save_assignment",
            mode = ?req.mode,
            resource = %req.resource,
            months = req.months.len()
        )
        .entered();
        let mut report = MutationReport::default();

        if req.capacity_edit {
            if req.resource.is_assignment() {
                report.skip(
                    None,
                    None,
                    ResolutionError::CapacityOnAssignment(req.resource.clone()),
                );
                return report;
            }
            for month in &req.months {
                self.write_capacity(&mut report, req.resource.entity(), month, req.effort);
            }
            return report;
        }

        let pair = match self.resolve_pair(req) {
            Ok(pair) => pair,
            Err(reason) => {
                report.skip(None, None, reason);
                return report;
            }
        };
        let person = self.resolve_template(ForestKind::People, &pair.person, req.new_item.as_ref());
        let item =
            self.resolve_template(ForestKind::Projects, &pair.work_item, req.new_item.as_ref());

        for month in &req.months {
            let write = EffortWrite {
                month,
                effort: req.effort,
                role: req.role.as_deref(),
            };
            self.mirror_upsert(
                &mut report,
                ForestKind::People,
                (&pair.person, person.as_ref()),
                (&pair.work_item, item.as_ref()),
                &write,
            );
            self.mirror_upsert(
                &mut report,
                ForestKind::Projects,
                (&pair.work_item, item.as_ref()),
                (&pair.person, person.as_ref()),
                &write,
            );
        }
        report
    }

    /// Remove months from one assignment in both forests
    ///
    /// An empty month list removes the whole assignment. A copy left with no
    /// months is spliced out of its parent.
    pub fn delete_allocation(&mut self, req: &DeleteAllocation) -> MutationReport {
        let _span = tracing::debug_span!(
            "delete_allocation",
            resource = %req.resource,
            months = req.months.len()
        )
        .entered();
        let mut report = MutationReport::default();

        let entity = req.resource.entity().clone();
        let Some(parent) = resolve_parent(&req.resource, req.parent.as_ref()) else {
            report.skip(
                None,
                None,
                ResolutionError::MissingParent(req.resource.clone()),
            );
            return report;
        };

        let mut months: Vec<&MonthLabel> = Vec::with_capacity(req.months.len());
        for month in &req.months {
            if !months.contains(&month) {
                months.push(month);
            }
        }

        let mut removed = vec![0usize; months.len()];
        let mut matched = false;
        for kind in ForestKind::ALL {
            for (root, child) in [(&parent, &entity), (&entity, &parent)] {
                let forest = self.store.forest_mut(kind);
                let Some(node) = forest.assignment_mut(root, child) else {
                    continue;
                };
                matched = true;
                let emptied = if req.months.is_empty() {
                    true
                } else {
                    for (i, month) in months.iter().copied().enumerate() {
                        if node.remove_month(month) {
                            removed[i] += 1;
                            report.written += 1;
                            tracing::debug!(forest = %kind, parent = %root, entity = %child, %month, "allocation month removed");
                        }
                    }
                    node.allocations.is_empty()
                };
                if emptied {
                    if let Some(pruned) = forest.remove_child(root, child) {
                        tracing::debug!(forest = %kind, id = %pruned.id, "assignment pruned");
                        report.pruned.push(pruned.id);
                    }
                }
            }
        }

        let missing = || ResolutionError::MissingAssignment {
            parent: parent.clone(),
            entity: entity.clone(),
        };
        if !matched {
            report.skip(None, None, missing());
        } else {
            for (month, count) in months.iter().copied().zip(&removed) {
                if *count == 0 {
                    report.skip(None, Some(month), missing());
                }
            }
        }
        report
    }

    /// Overwrite a root's capacity for one month
    ///
    /// Not mirrored: only one forest treats the id as a root.
    pub fn update_capacity(
        &mut self,
        resource: &EntityId,
        month: &MonthLabel,
        capacity: Quantity,
    ) -> MutationReport {
        let mut report = MutationReport::default();
        self.write_capacity(&mut report, resource, month, capacity);
        report
    }

    /// Save from the inline cell editor
    ///
    /// A target without a parent is a root and gets a capacity write; an
    /// assignment gets a mirrored effort write.
    pub fn inline_save(&mut self, req: &InlineSave) -> MutationReport {
        let _span = tracing::debug_span!(
            "inline_save",
            resource = %req.resource,
            month = %req.month,
            is_capacity = req.is_capacity
        )
        .entered();
        let entity = req.resource.entity().clone();
        match resolve_parent(&req.resource, req.parent.as_ref()) {
            None => self.update_capacity(&entity, &req.month, req.value),
            Some(parent) if req.is_capacity => {
                let mut report = MutationReport::default();
                report.skip(
                    None,
                    Some(&req.month),
                    ResolutionError::CapacityOnAssignment(NodeId::assignment(entity, parent)),
                );
                report
            }
            Some(parent) => self.save_assignment(&SaveAssignment::edit(
                entity,
                parent,
                vec![req.month.clone()],
                req.value,
            )),
        }
    }

    fn write_capacity(
        &mut self,
        report: &mut MutationReport,
        resource: &EntityId,
        month: &MonthLabel,
        capacity: Quantity,
    ) {
        let mut found = false;
        for kind in ForestKind::ALL {
            if let Some(root) = self.store.forest_mut(kind).root_mut(resource) {
                root.set_capacity(month.clone(), capacity);
                report.written += 1;
                found = true;
                tracing::debug!(forest = %kind, %resource, %month, capacity = capacity.get(), "capacity updated");
            }
        }
        if !found {
            report.skip(None, Some(month), ResolutionError::NotARoot(resource.clone()));
        }
    }

    /// Work out which side of the pair is the person
    fn resolve_pair(&self, req: &SaveAssignment) -> Result<AssignmentPair, ResolutionError> {
        let entity = req.resource.entity();
        match req.mode {
            SaveMode::Add => {
                let item = req.new_item.as_ref().ok_or(ResolutionError::MissingTemplate)?;
                let resource_is_person = if self.store.people().root(entity).is_some() {
                    true
                } else if self.store.projects().root(entity).is_some() {
                    false
                } else {
                    item.kind == NodeKind::WorkItem
                };
                Ok(if resource_is_person {
                    AssignmentPair {
                        person: entity.clone(),
                        work_item: item.id.clone(),
                    }
                } else {
                    AssignmentPair {
                        person: item.id.clone(),
                        work_item: entity.clone(),
                    }
                })
            }
            SaveMode::Edit => {
                let parent = resolve_parent(&req.resource, req.parent.as_ref())
                    .ok_or_else(|| ResolutionError::MissingParent(req.resource.clone()))?;
                if self.store.people().root(&parent).is_some() {
                    Ok(AssignmentPair {
                        person: parent,
                        work_item: entity.clone(),
                    })
                } else if self.store.projects().root(&parent).is_some() {
                    Ok(AssignmentPair {
                        person: entity.clone(),
                        work_item: parent,
                    })
                } else {
                    Err(ResolutionError::UnknownParent(parent))
                }
            }
        }
    }

    /// Look up or synthesize the descriptive shape of an entity
    ///
    /// Tried in order: the root in its home forest, the supplied template,
    /// a mirrored copy in the other forest.
    fn resolve_template(
        &self,
        home: ForestKind,
        entity: &EntityId,
        supplied: Option<&NodeTemplate>,
    ) -> Result<NodeTemplate, ResolutionError> {
        if let Some(root) = self.store.forest(home).root(entity) {
            return Ok(NodeTemplate::from_node(root));
        }
        if let Some(template) = supplied.filter(|t| &t.id == entity) {
            if template.kind != home.root_kind() {
                return Err(ResolutionError::TemplateKind {
                    id: entity.clone(),
                    expected: home.root_kind(),
                    actual: template.kind,
                });
            }
            return Ok(template.clone());
        }
        self.store
            .forest(home.other())
            .assignments()
            .find(|(_, child)| child.entity() == entity)
            .map(|(_, child)| NodeTemplate::from_node(child))
            .ok_or_else(|| ResolutionError::UnknownEntity(entity.clone()))
    }

    /// Write one month of effort for `child` under root `parent` in one forest
    ///
    /// Overwrites the existing copy if there is one, otherwise appends a new
    /// `child::parent` copy (creating the root from its template if needed).
    fn mirror_upsert(
        &mut self,
        report: &mut MutationReport,
        kind: ForestKind,
        (parent, parent_template): (&EntityId, Result<&NodeTemplate, &ResolutionError>),
        (child, child_template): (&EntityId, Result<&NodeTemplate, &ResolutionError>),
        write: &EffortWrite<'_>,
    ) {
        let default_capacity = self.settings.default_capacity;
        let forest = self.store.forest_mut(kind);
        let root_exists = forest.root(parent).is_some();
        let exists = root_exists && forest.assignment(parent, child).is_some();

        let new_child = if exists {
            None
        } else {
            match child_template {
                Ok(template) => Some(template.to_child(parent)),
                Err(reason) => {
                    report.skip(Some(kind), Some(write.month), reason.clone());
                    return;
                }
            }
        };

        if !root_exists {
            match parent_template {
                Ok(template) => {
                    forest.push_root(template.to_root());
                    report.created.push(NodeId::Root(parent.clone()));
                    tracing::debug!(forest = %kind, root = %parent, "root created");
                }
                Err(reason) => {
                    report.skip(Some(kind), Some(write.month), reason.clone());
                    return;
                }
            }
        }
        if let Some(root) = forest.root_mut(parent) {
            if root.cell(write.month).is_none() {
                root.set_capacity(write.month.clone(), default_capacity);
            }
        }

        match new_child {
            None => {
                if let Some(node) = forest.assignment_mut(parent, child) {
                    write.apply(node, default_capacity);
                    report.written += 1;
                    tracing::debug!(forest = %kind, %parent, %child, month = %write.month, effort = write.effort.get(), "assignment effort overwritten");
                }
            }
            Some(mut node) => {
                write.apply(&mut node, default_capacity);
                let id = node.id.clone();
                if forest.push_child(parent, node) {
                    report.written += 1;
                    tracing::debug!(forest = %kind, %id, month = %write.month, effort = write.effort.get(), "assignment created");
                    report.created.push(id);
                }
            }
        }
    }
}

/// One month of effort (and optional role) for one copy
#[derive(Debug)]
struct EffortWrite<'r> {
    month: &'r MonthLabel,
    effort: Quantity,
    role: Option<&'r str>,
}

impl EffortWrite<'_> {
    fn apply(&self, node: &mut ResourceNode, default_capacity: Quantity) {
        node.set_effort(self.month.clone(), self.effort, default_capacity);
        if let Some(role) = self.role {
            node.attributes.role = Some(role.to_string());
        }
    }
}

/// Explicit parent, else the parent encoded in a composite id
fn resolve_parent(resource: &NodeId, explicit: Option<&EntityId>) -> Option<EntityId> {
    explicit.or_else(|| resource.encoded_parent()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SeedForests;
    use pretty_assertions::assert_eq;

    fn eid(s: &str) -> EntityId {
        EntityId::new(s).unwrap()
    }

    fn q(v: f64) -> Quantity {
        Quantity::new(v).unwrap()
    }

    fn m(s: &str) -> MonthLabel {
        MonthLabel::new(s)
    }

    fn person(id: &str) -> NodeTemplate {
        NodeTemplate::new(eid(id), format!("Person {id}"), NodeKind::Person)
    }

    fn project(id: &str) -> NodeTemplate {
        NodeTemplate::new(eid(id), format!("Project {id}"), NodeKind::WorkItem)
    }

    fn store() -> TreeStore {
        TreeStore::from_seed(SeedForests {
            people: vec![person("e1").to_root(), person("e2").to_root()],
            projects: vec![project("p1").to_root()],
        })
        .unwrap()
    }

    fn effort(
        store: &TreeStore,
        kind: ForestKind,
        parent: &str,
        child: &str,
        month: &str,
    ) -> Option<Quantity> {
        store
            .forest(kind)
            .assignment(&eid(parent), &eid(child))
            .and_then(|n| n.cell(&m(month)))
            .map(|c| c.effort)
    }

    #[test]
    fn add_from_people_root_mirrors_into_projects() {
        let mut store = store();
        let report = AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::add(
            eid("e1"),
            project("p1"),
            vec![m("Jan")],
            q(5.0),
        ));
        assert!(report.is_clean());
        assert_eq!(report.written, 2);
        assert_eq!(effort(&store, ForestKind::People, "e1", "p1", "Jan"), Some(q(5.0)));
        assert_eq!(effort(&store, ForestKind::Projects, "p1", "e1", "Jan"), Some(q(5.0)));
    }

    #[test]
    fn add_from_projects_root_attaches_person() {
        let mut store = store();
        AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::add(
            eid("p1"),
            person("e2"),
            vec![m("Feb")],
            q(3.0),
        ));
        assert_eq!(effort(&store, ForestKind::People, "e2", "p1", "Feb"), Some(q(3.0)));
        assert_eq!(effort(&store, ForestKind::Projects, "p1", "e2", "Feb"), Some(q(3.0)));
    }

    #[test]
    fn add_with_new_project_creates_its_root() {
        let mut store = store();
        let report = AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::add(
            eid("e1"),
            project("p9"),
            vec![m("Jan")],
            q(5.0),
        ));
        assert!(report.created.contains(&NodeId::Root(eid("p9"))));
        let root = store.projects().root(&eid("p9")).unwrap();
        assert_eq!(root.capacity(&m("Jan")), Quantity::DEFAULT_CAPACITY);
        assert_eq!(root.children[0].id.to_string(), "e1::p9");
    }

    #[test]
    fn edit_overwrites_and_stamps_role_on_both_copies() {
        let mut store = store();
        let mut mutator = AllocationMutator::new(&mut store);
        mutator.save_assignment(&SaveAssignment::add(eid("e1"), project("p1"), vec![m("Jan")], q(5.0)));
        mutator.save_assignment(
            &SaveAssignment::edit(eid("p1"), eid("e1"), vec![m("Jan"), m("Feb")], q(8.0))
                .with_role("Lead"),
        );
        assert_eq!(effort(&store, ForestKind::Projects, "p1", "e1", "Feb"), Some(q(8.0)));
        assert_eq!(effort(&store, ForestKind::People, "e1", "p1", "Jan"), Some(q(8.0)));
        let copy = store.people().assignment(&eid("e1"), &eid("p1")).unwrap();
        assert_eq!(copy.attributes.role.as_deref(), Some("Lead"));
        let mirror = store.projects().assignment(&eid("p1"), &eid("e1")).unwrap();
        assert_eq!(mirror.attributes.role.as_deref(), Some("Lead"));
    }

    #[test]
    fn edit_with_unknown_parent_is_skipped() {
        let mut store = store();
        let before = store.snapshot();
        let report = AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::edit(
            eid("p1"),
            eid("ghost"),
            vec![m("Jan")],
            q(1.0),
        ));
        assert_eq!(report.skipped[0].reason, ResolutionError::UnknownParent(eid("ghost")));
        assert_eq!(store, before);
    }

    #[test]
    fn unresolvable_item_is_skipped_in_both_forests() {
        let mut store = store();
        let report = AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::edit(
            eid("p8"),
            eid("e1"),
            vec![m("Jan")],
            q(1.0),
        ));
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .all(|s| s.reason == ResolutionError::UnknownEntity(eid("p8"))));
        assert!(store.people().assignment(&eid("e1"), &eid("p8")).is_none());
        assert!(store.projects().root(&eid("p8")).is_none());
    }

    #[test]
    fn template_of_wrong_kind_is_rejected() {
        let mut store = store();
        let report = AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::add(
            eid("e1"),
            NodeTemplate::new(eid("x1"), "Odd", NodeKind::WorkItem),
            vec![m("Jan")],
            q(1.0),
        ));
        assert!(report.is_clean());

        let report = AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::add(
            eid("p1"),
            NodeTemplate::new(eid("x2"), "Odd", NodeKind::WorkItem),
            vec![m("Jan")],
            q(1.0),
        ));
        assert!(report.skipped.iter().any(|s| matches!(
            s.reason,
            ResolutionError::TemplateKind { .. }
        )));
    }

    #[test]
    fn delete_last_month_prunes_both_copies() {
        let mut store = store();
        let mut mutator = AllocationMutator::new(&mut store);
        mutator.save_assignment(&SaveAssignment::add(eid("e1"), project("p1"), vec![m("Mar")], q(2.0)));
        let report = mutator.delete_allocation(&DeleteAllocation::month(eid("p1"), eid("e1"), m("Mar")));
        assert_eq!(report.pruned.len(), 2);
        assert!(store.people().root(&eid("e1")).unwrap().children.is_empty());
        assert!(store.projects().root(&eid("p1")).unwrap().children.is_empty());
    }

    #[test]
    fn delete_one_of_two_months_keeps_copies() {
        let mut store = store();
        let mut mutator = AllocationMutator::new(&mut store);
        mutator.save_assignment(&SaveAssignment::add(
            eid("e1"),
            project("p1"),
            vec![m("Jan"), m("Feb")],
            q(2.0),
        ));
        let report = mutator.delete_allocation(&DeleteAllocation::month(eid("e1"), eid("p1"), m("Jan")));
        assert!(report.pruned.is_empty());
        assert_eq!(report.written, 2);
        assert_eq!(effort(&store, ForestKind::People, "e1", "p1", "Jan"), None);
        assert_eq!(effort(&store, ForestKind::Projects, "p1", "e1", "Feb"), Some(q(2.0)));
    }

    #[test]
    fn delete_missing_month_is_reported() {
        let mut store = store();
        let mut mutator = AllocationMutator::new(&mut store);
        mutator.save_assignment(&SaveAssignment::add(eid("e1"), project("p1"), vec![m("Jan")], q(2.0)));
        let report = mutator.delete_allocation(&DeleteAllocation::new(
            eid("p1"),
            eid("e1"),
            vec![m("Jun"), m("Jan")],
        ));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].month, Some(m("Jun")));
        assert_eq!(report.pruned.len(), 2);
    }

    #[test]
    fn repeated_delete_month_counts_once() {
        let mut store = store();
        let mut mutator = AllocationMutator::new(&mut store);
        mutator.save_assignment(&SaveAssignment::add(
            eid("e1"),
            project("p1"),
            vec![m("Jan"), m("Feb")],
            q(2.0),
        ));
        let report = mutator.delete_allocation(&DeleteAllocation::new(
            eid("p1"),
            eid("e1"),
            vec![m("Jan"), m("Jan")],
        ));
        assert!(report.is_clean());
        assert_eq!(report.written, 2);
        assert_eq!(effort(&store, ForestKind::People, "e1", "p1", "Feb"), Some(q(2.0)));
    }

    #[test]
    fn unassign_removes_whole_assignment() {
        let mut store = store();
        let mut mutator = AllocationMutator::new(&mut store);
        mutator.save_assignment(&SaveAssignment::add(
            eid("e1"),
            project("p1"),
            vec![m("Jan"), m("Feb")],
            q(2.0),
        ));
        let report = mutator.delete_allocation(&DeleteAllocation::unassign(eid("p1"), eid("e1")));
        assert_eq!(report.pruned.len(), 2);
        assert!(store.people().assignment(&eid("e1"), &eid("p1")).is_none());
    }

    #[test]
    fn capacity_is_root_only() {
        let mut store = store();
        let mut mutator = AllocationMutator::new(&mut store);
        let report = mutator.update_capacity(&eid("p1"), &m("Feb"), q(10.0));
        assert_eq!(report.written, 1);
        let report = mutator.update_capacity(&eid("nobody"), &m("Feb"), q(10.0));
        assert_eq!(report.skipped[0].reason, ResolutionError::NotARoot(eid("nobody")));
        assert_eq!(store.projects().root(&eid("p1")).unwrap().capacity(&m("Feb")), q(10.0));
    }

    #[test]
    fn inline_save_dispatches_on_parent() {
        let mut store = store();
        let mut mutator = AllocationMutator::new(&mut store);
        mutator.save_assignment(&SaveAssignment::add(eid("e1"), project("p1"), vec![m("Jan")], q(2.0)));

        let root = mutator.inline_save(&InlineSave {
            resource: NodeId::Root(eid("p1")),
            parent: None,
            month: m("Jan"),
            value: q(12.0),
            is_capacity: true,
        });
        assert_eq!(root.written, 1);

        let child = mutator.inline_save(&InlineSave {
            resource: "e1::p1".parse().unwrap(),
            parent: None,
            month: m("Jan"),
            value: q(6.0),
            is_capacity: false,
        });
        assert_eq!(child.written, 2);
        assert_eq!(effort(&store, ForestKind::People, "e1", "p1", "Jan"), Some(q(6.0)));
        assert_eq!(store.projects().root(&eid("p1")).unwrap().capacity(&m("Jan")), q(12.0));
    }

    #[test]
    fn inline_capacity_on_assignment_is_skipped() {
        let mut store = store();
        let report = AllocationMutator::new(&mut store).inline_save(&InlineSave {
            resource: "e1::p1".parse().unwrap(),
            parent: None,
            month: m("Jan"),
            value: q(6.0),
            is_capacity: true,
        });
        assert!(matches!(
            report.skipped[0].reason,
            ResolutionError::CapacityOnAssignment(_)
        ));
    }
}
