//! Planner facade
//!
//! Owns the configuration, the [`TreeStore`] and the expansion state of both
//! views. Editor input is validated here before the mutator sees it;
//! selection outcomes are routed to the mutator or the assignment editor.

use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::input::{DeleteInput, InlineInput, SaveInput};
use capgrid_model::{parse_quantity, EntityId, MonthError, MonthLabel, MonthSet, NodeId};
use capgrid_select::{CellTarget, Grid, Outcome, SelectionEngine};
use capgrid_store::{
    AllocationMutator, DeleteAllocation, ForestKind, InlineSave, MutationReport, MutationSettings,
    ResolutionError, SeedForests, SkippedWrite, TreeStore,
};
use capgrid_view::{materialize, ExpansionState, FilterSet, GroupBy, Row, ViewQuery};

/// Opens the assignment editor for a clicked cell
///
/// Implemented by the host; the planner only decides when to call it.
pub trait AssignmentEditor {
    fn open(&mut self, view: ForestKind, target: &CellTarget);
}

/// Store, configuration and per-view expansion state
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    months: MonthSet,
    settings: MutationSettings,
    store: TreeStore,
    people_expansion: ExpansionState,
    projects_expansion: ExpansionState,
}

impl Planner {
    /// Build a planner over seed forests
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the seed is rejected
    pub fn new(config: PlannerConfig, seed: SeedForests) -> Result<Self, PlannerError> {
        config.validate()?;
        let months = config.month_set()?;
        let settings = config.mutation_settings()?;
        let store = TreeStore::from_seed(seed)?;
        tracing::info!(months = months.len(), "planner ready");
        Ok(Self {
            config,
            months,
            settings,
            store,
            people_expansion: ExpansionState::new(),
            projects_expansion: ExpansionState::new(),
        })
    }

    /// Build a planner from a seed JSON document
    ///
    /// # Errors
    /// Returns error if the JSON does not decode or [`Planner::new`] fails
    pub fn from_json(config: PlannerConfig, seed_json: &str) -> Result<Self, PlannerError> {
        Self::new(config, SeedForests::from_json_str(seed_json)?)
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn months(&self) -> &MonthSet {
        &self.months
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    /// O(1) copy of the current forests
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> TreeStore {
        self.store.snapshot()
    }

    /// Expansion state of one view
    #[inline]
    #[must_use]
    pub fn expansion(&self, view: ForestKind) -> &ExpansionState {
        match view {
            ForestKind::People => &self.people_expansion,
            ForestKind::Projects => &self.projects_expansion,
        }
    }

    fn expansion_mut(&mut self, view: ForestKind) -> &mut ExpansionState {
        match view {
            ForestKind::People => &mut self.people_expansion,
            ForestKind::Projects => &mut self.projects_expansion,
        }
    }

    /// Flip a node's expansion; returns whether it is now expanded
    pub fn toggle_expanded(&mut self, view: ForestKind, id: &NodeId) -> bool {
        self.expansion_mut(view).toggle_node(id)
    }

    /// Flip a group's collapse; returns whether it is now collapsed
    pub fn toggle_group_collapsed(&mut self, view: ForestKind, group_key: &str) -> bool {
        self.expansion_mut(view).toggle_group(group_key)
    }

    /// Query over every configured month with this view's expansion
    #[must_use]
    pub fn query(&self, view: ForestKind) -> ViewQuery {
        ViewQuery::new(self.months.months().to_vec())
            .with_expansion(self.expansion(view).clone())
            .with_settings(self.config.view_settings())
    }

    /// Display rows for one view
    #[must_use]
    pub fn materialize(&self, view: ForestKind, filters: &FilterSet, group_by: GroupBy) -> Vec<Row> {
        let query = self
            .query(view)
            .with_filters(filters.clone())
            .with_group_by(group_by);
        materialize(self.store.forest(view), &query)
    }

    /// Selectable grid for one view
    #[must_use]
    pub fn grid(&self, view: ForestKind, filters: &FilterSet, group_by: GroupBy) -> Grid {
        Grid::new(
            self.materialize(view, filters, group_by),
            self.months.months().to_vec(),
        )
    }

    fn mutator(&mut self) -> AllocationMutator<'_> {
        AllocationMutator::with_settings(&mut self.store, self.settings)
    }

    fn check_month(&self, month: &MonthLabel) -> Result<(), PlannerError> {
        match self.months.index_of(month) {
            Some(_) => Ok(()),
            None => Err(MonthError::Unknown(month.to_string()).into()),
        }
    }

    /// Save from the assignment editor
    ///
    /// # Errors
    /// Returns error if the form has a malformed id, month or amount
    pub fn save_assignment(&mut self, input: &SaveInput) -> Result<MutationReport, PlannerError> {
        let req = input.validate(&self.months)?;
        Ok(self.mutator().save_assignment(&req))
    }

    /// Remove months of one assignment, or the whole assignment
    ///
    /// # Errors
    /// Returns error if the request has a malformed id or month
    pub fn delete_allocation(&mut self, input: &DeleteInput) -> Result<MutationReport, PlannerError> {
        let req = input.validate(&self.months)?;
        Ok(self.mutator().delete_allocation(&req))
    }

    /// Save from the inline cell editor
    ///
    /// # Errors
    /// Returns error if the input has a malformed id, month or amount
    pub fn inline_save(&mut self, input: &InlineInput) -> Result<MutationReport, PlannerError> {
        let req = input.validate(&self.months)?;
        Ok(self.mutator().inline_save(&req))
    }

    /// Overwrite a root's capacity for one month
    ///
    /// # Errors
    /// Returns error if the id, month or amount is invalid
    pub fn update_capacity(
        &mut self,
        resource: &str,
        month: &str,
        capacity: &str,
    ) -> Result<MutationReport, PlannerError> {
        let resource = EntityId::new(resource)?;
        let month = self.months.resolve(month.trim())?;
        let capacity = parse_quantity(capacity)?;
        Ok(self.mutator().update_capacity(&resource, &month, capacity))
    }

    /// Write one value into every selected cell
    ///
    /// Roots get a capacity write, assignments an effort write. Each cell is
    /// an independent single-month write.
    ///
    /// # Errors
    /// Returns error if the value is not a valid amount or a cell's month is
    /// not configured; nothing is written in that case
    pub fn bulk_save(&mut self, cells: &[CellTarget], value: &str) -> Result<MutationReport, PlannerError> {
        let value = parse_quantity(value)?;
        for cell in cells {
            self.check_month(&cell.month)?;
        }
        let mut mutator = self.mutator();
        let mut report = MutationReport::default();
        for cell in cells {
            let single = if cell.is_root {
                mutator.update_capacity(cell.resource.entity(), &cell.month, value)
            } else {
                mutator.inline_save(&InlineSave {
                    resource: cell.resource.clone(),
                    parent: cell.parent.clone(),
                    month: cell.month.clone(),
                    value,
                    is_capacity: false,
                })
            };
            report.merge(single);
        }
        tracing::debug!(cells = cells.len(), written = report.written, "bulk save applied");
        Ok(report)
    }

    /// Remove the selected months from every selected assignment
    ///
    /// Root cells carry no assignment and are reported as skipped.
    ///
    /// # Errors
    /// Returns error if a cell's month is not configured; nothing is removed
    /// in that case
    pub fn bulk_delete(&mut self, cells: &[CellTarget]) -> Result<MutationReport, PlannerError> {
        for cell in cells {
            self.check_month(&cell.month)?;
        }
        let mut mutator = self.mutator();
        let mut report = MutationReport::default();
        for cell in cells {
            if cell.is_root {
                tracing::warn!(resource = %cell.resource, month = %cell.month, "bulk delete skipped root cell");
                report.skipped.push(SkippedWrite {
                    forest: None,
                    month: Some(cell.month.clone()),
                    reason: ResolutionError::MissingParent(cell.resource.clone()),
                });
                continue;
            }
            report.merge(mutator.delete_allocation(&DeleteAllocation {
                resource: cell.resource.clone(),
                parent: cell.parent.clone(),
                months: vec![cell.month.clone()],
            }));
        }
        tracing::debug!(cells = cells.len(), pruned = report.pruned.len(), "bulk delete applied");
        Ok(report)
    }

    /// Act on a selection outcome
    ///
    /// Inline saves are written; editor requests are handed to `editor`.
    /// Other outcomes need nothing from the planner and return `None`.
    ///
    /// # Errors
    /// Returns error for a rejected inline draft or an unconfigured month
    pub fn apply(
        &mut self,
        view: ForestKind,
        outcome: Outcome,
        editor: &mut impl AssignmentEditor,
    ) -> Result<Option<MutationReport>, PlannerError> {
        match outcome {
            Outcome::OpenAssignmentEditor(target) => {
                tracing::debug!(%view, resource = %target.resource, month = %target.month, "opening assignment editor");
                editor.open(view, &target);
                Ok(None)
            }
            Outcome::InlineSave { target, value, is_capacity } => {
                self.check_month(&target.month)?;
                let req = InlineSave {
                    resource: target.resource,
                    parent: target.parent,
                    month: target.month,
                    value,
                    is_capacity,
                };
                Ok(Some(self.mutator().inline_save(&req)))
            }
            Outcome::EditRejected { input, reason } => {
                tracing::debug!(%input, %reason, "inline draft rejected");
                Err(reason.into())
            }
            Outcome::None
            | Outcome::EditStarted(_)
            | Outcome::RangeCommitted(_)
            | Outcome::ColumnToggled { .. }
            | Outcome::EditDiscarded => Ok(None),
        }
    }

    /// Release the pointer and act on the outcome
    ///
    /// # Errors
    /// Returns error if the engine rejects the gesture or [`Planner::apply`] fails
    pub fn pointer_up(
        &mut self,
        engine: &mut SelectionEngine,
        grid: &Grid,
        editor: &mut impl AssignmentEditor,
    ) -> Result<Option<MutationReport>, PlannerError> {
        let outcome = engine.pointer_up(grid)?;
        self.apply(engine.view(), outcome, editor)
    }

    /// Commit the open inline edit and act on the outcome
    ///
    /// # Errors
    /// Returns error if no edit is open or [`Planner::apply`] fails
    pub fn commit_edit(
        &mut self,
        engine: &mut SelectionEngine,
        editor: &mut impl AssignmentEditor,
    ) -> Result<Option<MutationReport>, PlannerError> {
        let outcome = engine.commit_edit()?;
        self.apply(engine.view(), outcome, editor)
    }
}
