//! Mirror consistency check
//!
//! For every (person, work item, month) with effort on either side, the
//! People copy and the Projects copy must agree.

use crate::store::TreeStore;
use capgrid_model::{EntityId, MonthLabel, Quantity};
use std::collections::BTreeMap;

/// One (person, work item, month) where the two forests disagree
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    pub person: EntityId,
    pub work_item: EntityId,
    pub month: MonthLabel,
    /// Effort under the person in the People forest (`None` if absent)
    pub people_effort: Option<Quantity>,
    /// Effort under the work item in the Projects forest (`None` if absent)
    pub projects_effort: Option<Quantity>,
}

type FactKey = (EntityId, EntityId, MonthLabel);

/// Every mirror mismatch, ordered by (person, work item, month)
///
/// Zero-effort cells on one side match an absent cell on the other.
#[must_use]
pub fn mirror_divergences(store: &TreeStore) -> Vec<Divergence> {
    let mut facts: BTreeMap<FactKey, (Option<Quantity>, Option<Quantity>)> = BTreeMap::new();

    for (root, child) in store.people().assignments() {
        for (month, cell) in &child.allocations {
            let key = (root.entity().clone(), child.entity().clone(), month.clone());
            facts.entry(key).or_default().0 = Some(cell.effort);
        }
    }
    for (root, child) in store.projects().assignments() {
        for (month, cell) in &child.allocations {
            let key = (child.entity().clone(), root.entity().clone(), month.clone());
            facts.entry(key).or_default().1 = Some(cell.effort);
        }
    }

    facts
        .into_iter()
        .filter(|(_, (people, projects))| {
            let a = people.unwrap_or(Quantity::ZERO);
            let b = projects.unwrap_or(Quantity::ZERO);
            !(a.is_zero() && b.is_zero()) && !a.approx_eq(b)
        })
        .map(
            |((person, work_item, month), (people_effort, projects_effort))| Divergence {
                person,
                work_item,
                month,
                people_effort,
                projects_effort,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SeedForests;
    use capgrid_model::{AllocationCell, NodeKind, NodeTemplate};

    fn eid(s: &str) -> EntityId {
        EntityId::new(s).unwrap()
    }

    fn q(v: f64) -> Quantity {
        Quantity::new(v).unwrap()
    }

    fn seeded(people_effort: f64, projects_effort: f64) -> TreeStore {
        let ada = NodeTemplate::new(eid("e1"), "Ada", NodeKind::Person);
        let atlas = NodeTemplate::new(eid("p1"), "Atlas", NodeKind::WorkItem);
        let people = ada.to_root().with_child(
            atlas
                .to_child(&eid("e1"))
                .with_cell("Jan".into(), AllocationCell::new(q(people_effort), q(20.0))),
        );
        let projects = atlas.to_root().with_child(
            ada.to_child(&eid("p1"))
                .with_cell("Jan".into(), AllocationCell::new(q(projects_effort), q(20.0))),
        );
        TreeStore::from_seed(SeedForests {
            people: vec![people],
            projects: vec![projects],
        })
        .unwrap()
    }

    #[test]
    fn mirrored_store_has_no_divergence() {
        assert!(mirror_divergences(&seeded(5.0, 5.0)).is_empty());
    }

    #[test]
    fn mismatched_effort_is_reported() {
        let found = mirror_divergences(&seeded(5.0, 3.0));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].person, eid("e1"));
        assert_eq!(found[0].work_item, eid("p1"));
        assert_eq!(found[0].people_effort, Some(q(5.0)));
        assert_eq!(found[0].projects_effort, Some(q(3.0)));
    }

    #[test]
    fn zero_effort_matches_absence() {
        let ada = NodeTemplate::new(eid("e1"), "Ada", NodeKind::Person);
        let atlas = NodeTemplate::new(eid("p1"), "Atlas", NodeKind::WorkItem);
        let people = ada.to_root().with_child(
            atlas
                .to_child(&eid("e1"))
                .with_cell("Jan".into(), AllocationCell::new(Quantity::ZERO, q(20.0))),
        );
        let store = TreeStore::from_seed(SeedForests {
            people: vec![people],
            projects: vec![atlas.to_root()],
        })
        .unwrap();
        assert!(mirror_divergences(&store).is_empty());
    }
}
