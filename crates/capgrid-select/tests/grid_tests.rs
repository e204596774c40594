use capgrid_model::NodeId;
use capgrid_select::{CellCoord, Grid, GridModel, Outcome, SelectionEngine, SelectionPhase};
use capgrid_store::ForestKind;
use capgrid_test_utils::{eid, months, SeedBuilder};
use capgrid_view::{materialize, ExpansionState, GroupBy, GroupField, ViewQuery};
use pretty_assertions::assert_eq;

fn projects_grid() -> Grid {
    let store = SeedBuilder::new()
        .person("e1", "Ada")
        .person("e2", "Grace")
        .project("p1", "Atlas")
        .assign("e1", "p1", &[("Jan", 5.0)])
        .assign("e2", "p1", &[("Feb", 3.0)])
        .build();
    let visible = months(&["Jan", "Feb"]);
    let query = ViewQuery::new(visible.clone())
        .with_expansion(ExpansionState::new().with_expanded(NodeId::Root(eid("p1"))));
    Grid::new(materialize(store.projects(), &query), visible)
}

#[test]
fn projects_child_click_opens_assignment_editor() {
    let grid = projects_grid();
    let mut engine = SelectionEngine::new(ForestKind::Projects);
    engine.pointer_down_cell(&grid, CellCoord::new(1, 0)).unwrap();
    let Outcome::OpenAssignmentEditor(target) = engine.pointer_up(&grid).unwrap() else {
        panic!("expected assignment editor");
    };
    assert_eq!(target.resource.to_string(), "e1::p1");
    assert_eq!(target.parent, Some(eid("p1")));
    assert_eq!(target.effort.get(), 5.0);
}

#[test]
fn projects_root_click_edits_capacity() {
    let grid = projects_grid();
    let mut engine = SelectionEngine::new(ForestKind::Projects);
    engine.pointer_down_cell(&grid, CellCoord::new(0, 1)).unwrap();
    assert!(matches!(engine.pointer_up(&grid).unwrap(), Outcome::EditStarted(_)));
    assert_eq!(engine.phase(), SelectionPhase::Editing);
}

#[test]
fn action_row_has_no_cells() {
    let grid = projects_grid();
    // root, two people, add-child row
    assert_eq!(grid.row_count(), 4);
    assert!(grid.cell_target(CellCoord::new(3, 0)).is_none());

    let mut engine = SelectionEngine::new(ForestKind::Projects);
    engine.pointer_down_header(&grid, 0).unwrap();
    engine.pointer_enter_header(1);
    engine.pointer_up(&grid).unwrap();
    assert_eq!(engine.summary().count(), 8);
    assert_eq!(engine.selected_cells(&grid).len(), 6);
}

#[test]
fn group_header_click_is_a_no_op() {
    let store = SeedBuilder::new()
        .person("e1", "Ada")
        .project("p1", "Atlas")
        .assign("e1", "p1", &[("Jan", 5.0)])
        .build();
    let visible = months(&["Jan"]);
    let query = ViewQuery::new(visible.clone())
        .with_group_by(GroupBy::Field(GroupField::Department));
    let grid = Grid::new(materialize(store.people(), &query), visible);

    let mut engine = SelectionEngine::new(ForestKind::People);
    engine.pointer_down_cell(&grid, CellCoord::new(0, 0)).unwrap();
    assert_eq!(engine.pointer_up(&grid).unwrap(), Outcome::None);
    assert_eq!(engine.phase(), SelectionPhase::Idle);
}
