use capgrid_model::{CellStatus, NodeAttributes, NodeId};
use capgrid_store::TreeStore;
use capgrid_test_utils::{eid, in_department, month, months, person, project, q, SeedBuilder};
use capgrid_view::{
    materialize, CapacityBucket, ExpansionState, Filter, FilterField, GroupBy, GroupField,
    RowContent, ViewQuery,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn team() -> SeedBuilder {
    SeedBuilder::new()
        .person_with(person("e1", "Ada").with_attributes(in_department("Eng")))
        .person_with(person("e2", "Grace").with_attributes(in_department("Ops")))
        .person_with(person("e3", "Linus").with_attributes(in_department("Eng")))
        .person("e4", "Idle")
        .project_with(project("p1", "Atlas").with_attributes(NodeAttributes {
            status: Some("Active".into()),
            ..NodeAttributes::default()
        }))
        .project("p2", "Borealis")
        .assign("e1", "p1", &[("Jan", 10.0), ("Feb", 7.0)])
        .assign("e2", "p1", &[("Feb", 5.0)])
        .assign("e3", "p2", &[("Jan", 4.0)])
}

#[test]
fn capacity_overrun_rolls_up_over_and_overbooked() {
    let store = team().capacity("p1", "Feb", 10.0).build();
    let query = ViewQuery::new(months(&["Feb"]));
    let rows = materialize(store.projects(), &query);

    let atlas = rows[0].resource().unwrap();
    assert_eq!(atlas.node.entity(), &eid("p1"));
    let feb = atlas.node.cell(&month("Feb")).unwrap();
    assert_eq!(feb.effort, q(12.0));
    assert_eq!(feb.capacity, q(10.0));
    assert_eq!(feb.status(), CellStatus::Over);
    assert_eq!(atlas.bucket, CapacityBucket::Overbooked);
}

#[test]
fn unfiltered_ungrouped_is_exactly_the_roots() {
    let store = team().build();
    let query = ViewQuery::new(months(&["Jan", "Feb"]));
    let rows = materialize(store.people(), &query);
    let ids: Vec<String> = rows.iter().map(|r| r.key()).collect();
    assert_eq!(ids, vec!["e1", "e2", "e3", "e4"]);
    assert!(rows.iter().all(|r| !r.is_group_header() && r.depth == 0));
}

#[test]
fn field_grouping_collapses_and_drops_empty_parents() {
    let store = team().build();
    let query = ViewQuery::new(months(&["Jan", "Feb"]))
        .with_group_by(GroupBy::Field(GroupField::Department));
    let rows = materialize(store.people(), &query);
    let keys: Vec<String> = rows.iter().map(|r| r.key()).collect();
    assert_eq!(
        keys,
        vec!["department:Eng", "e1", "e3", "department:Ops", "e2"]
    );
    assert_eq!(rows[1].depth, 1);

    let collapsed =
        query.with_expansion(ExpansionState::new().with_collapsed_group("department:Eng"));
    let rows = materialize(store.people(), &collapsed);
    let keys: Vec<String> = rows.iter().map(|r| r.key()).collect();
    assert_eq!(keys, vec!["department:Eng", "department:Ops", "e2"]);
}

#[test]
fn filter_inherits_parent_status() {
    let store = team().build();
    let query = ViewQuery::new(months(&["Jan", "Feb"]))
        .with_filter(Filter::field(FilterField::Status, ["Active"]))
        .with_expansion(
            ExpansionState::new()
                .with_expanded(NodeId::Root(eid("p1")))
                .with_expanded(NodeId::Root(eid("p2"))),
        );
    let rows = materialize(store.projects(), &query);
    let keys: Vec<String> = rows.iter().map(|r| r.key()).collect();
    // ungrouped keeps p2 even though all its children were filtered out
    assert_eq!(keys, vec!["p1", "e1::p1", "e2::p1", "add:p1", "p2", "add:p2"]);
}

#[test]
fn filtered_out_children_total_zero() {
    let mut seed = team().seed();
    let borealis = seed
        .projects
        .iter_mut()
        .find(|p| p.entity() == &eid("p2"))
        .unwrap();
    borealis.set_effort(month("Jan"), q(4.0), q(20.0));
    let store = TreeStore::from_seed(seed).unwrap();

    let query = ViewQuery::new(months(&["Jan"]))
        .with_filter(Filter::field(FilterField::Status, ["Active"]));
    let rows = materialize(store.projects(), &query);
    let p2 = rows
        .iter()
        .filter_map(|r| r.resource())
        .find(|r| r.node.entity() == &eid("p2"))
        .unwrap();
    assert!(!p2.has_children);
    assert_eq!(p2.node.effort(&month("Jan")), q(0.0));
}

#[test]
fn hierarchy_grouping_in_projects_view() {
    let store = team().build();
    let query = ViewQuery::new(months(&["Jan", "Feb"])).with_group_by(GroupBy::Hierarchy);
    let rows = materialize(store.projects(), &query);
    let keys: Vec<String> = rows.iter().map(|r| r.key()).collect();
    assert_eq!(
        keys,
        vec![
            "hierarchy:p1",
            "e1::p1",
            "e2::p1",
            "add:p1",
            "hierarchy:p2",
            "e3::p2",
            "add:p2"
        ]
    );
    let RowContent::GroupHeader(header) = &rows[0].content else {
        panic!("expected group header");
    };
    assert_eq!(header.summary.count, 2);
    assert!(header.summary.subtext().starts_with("2 people"));
}

#[test]
fn rollup_is_not_written_back() {
    let store = team().build();
    let before = store.snapshot();
    let _ = materialize(store.projects(), &ViewQuery::new(months(&["Jan"])));
    assert_eq!(store, before);
    assert_eq!(
        store.projects().root(&eid("p1")).unwrap().effort(&month("Jan")),
        q(0.0)
    );
}

proptest! {
    #[test]
    fn prop_bucket_filters_partition_children(
        efforts in prop::collection::vec(0.0f64..40.0, 1..8),
    ) {
        let mut builder = SeedBuilder::new().project("p1", "Atlas");
        for (i, effort) in efforts.iter().enumerate() {
            let id = format!("e{i}");
            builder = builder.person(&id, &id).assign(&id, "p1", &[("Jan", *effort)]);
        }
        let store = builder.build();
        let expansion = ExpansionState::new().with_expanded(NodeId::Root(eid("p1")));

        let mut seen = Vec::new();
        for bucket in CapacityBucket::ALL {
            let query = ViewQuery::new(months(&["Jan"]))
                .with_filter(Filter::buckets([bucket]))
                .with_expansion(expansion.clone());
            let rows = materialize(store.projects(), &query);
            seen.extend(
                rows.iter()
                    .filter_map(|r| r.resource())
                    .filter(|r| !r.is_root)
                    .map(|r| r.id().to_string()),
            );
        }
        seen.sort();
        let mut all: Vec<String> = (0..efforts.len()).map(|i| format!("e{i}::p1")).collect();
        all.sort();
        prop_assert_eq!(seen, all);
    }
}
