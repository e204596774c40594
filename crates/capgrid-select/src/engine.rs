//! The selection engine
//!
//! Turns pointer gestures into row, column and rectangle selections, and
//! hosts the inline capacity editor. Every phase change is checked against
//! [`allowed_transitions`](crate::allowed_transitions).

use crate::error::SelectionError;
use crate::geometry::{CellCoord, CellRange};
use crate::grid::{CellTarget, GridModel};
use crate::state::{validate_transition, SelectionPhase};
use crate::summary::SelectionSummary;
use capgrid_model::{parse_quantity, MonthLabel, NodeId, Quantity, QuantityError};
use capgrid_store::ForestKind;
use indexmap::IndexSet;
use std::collections::BTreeSet;

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub origin: CellCoord,
    pub end: CellCoord,
    /// Started on a month header; the rectangle spans every row
    pub whole_column: bool,
}

/// An open inline edit
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub target: CellTarget,
    pub draft: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging(DragState),
    Editing(EditSession),
}

impl SelectionState {
    #[must_use]
    pub fn phase(&self) -> SelectionPhase {
        match self {
            Self::Idle => SelectionPhase::Idle,
            Self::Dragging(_) => SelectionPhase::Dragging,
            Self::Editing(_) => SelectionPhase::Editing,
        }
    }
}

/// What a gesture asks the host to do
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    None,
    /// Click on a cell that is edited through the assignment editor
    OpenAssignmentEditor(CellTarget),
    /// Inline edit opened with the current value as draft
    EditStarted(CellTarget),
    RangeCommitted(CellRange),
    ColumnToggled { month: MonthLabel, selected: bool },
    /// Parsed inline value ready to save
    InlineSave {
        target: CellTarget,
        value: Quantity,
        is_capacity: bool,
    },
    EditDiscarded,
    /// Draft was not a valid amount; nothing is saved
    EditRejected { input: String, reason: QuantityError },
}

/// Selection and inline-edit state for one view
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEngine {
    view: ForestKind,
    state: SelectionState,
    rectangle: Option<CellRange>,
    rows: IndexSet<NodeId>,
    months: BTreeSet<usize>,
}

impl SelectionEngine {
    #[must_use]
    pub fn new(view: ForestKind) -> Self {
        Self {
            view,
            state: SelectionState::Idle,
            rectangle: None,
            rows: IndexSet::new(),
            months: BTreeSet::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn view(&self) -> ForestKind {
        self.view
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> SelectionPhase {
        self.state.phase()
    }

    #[inline]
    #[must_use]
    pub fn rectangle(&self) -> Option<CellRange> {
        self.rectangle
    }

    /// Selected row ids in selection order
    pub fn selected_rows(&self) -> impl Iterator<Item = &NodeId> {
        self.rows.iter()
    }

    /// Selected month columns, ascending
    pub fn selected_month_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.months.iter().copied()
    }

    fn enter(&mut self, next: SelectionState) -> Result<(), SelectionError> {
        let (from, to) = (self.state.phase(), next.phase());
        validate_transition(from, to)?;
        if from != to {
            tracing::debug!(view = %self.view, ?from, ?to, "selection transition");
        }
        self.state = next;
        Ok(())
    }

    /// Pointer pressed on a cell
    ///
    /// An open inline edit is committed first; its outcome is returned.
    ///
    /// # Errors
    /// Returns error if the cell is outside the grid
    pub fn pointer_down_cell(
        &mut self,
        grid: &impl GridModel,
        coord: CellCoord,
    ) -> Result<Outcome, SelectionError> {
        if !grid.in_bounds(coord) {
            return Err(SelectionError::OutOfBounds(coord));
        }
        let committed = self.commit_if_editing()?;
        self.enter(SelectionState::Dragging(DragState {
            origin: coord,
            end: coord,
            whole_column: false,
        }))?;
        Ok(committed)
    }

    /// Pointer pressed on a month header
    ///
    /// # Errors
    /// Returns error if the column is outside the grid
    pub fn pointer_down_header(
        &mut self,
        grid: &impl GridModel,
        col: usize,
    ) -> Result<Outcome, SelectionError> {
        if col >= grid.col_count() {
            return Err(SelectionError::ColumnOutOfBounds(col));
        }
        let committed = self.commit_if_editing()?;
        let origin = CellCoord::new(0, col);
        self.enter(SelectionState::Dragging(DragState {
            origin,
            end: origin,
            whole_column: true,
        }))?;
        Ok(committed)
    }

    /// Pointer moved over a cell; ignored unless dragging
    pub fn pointer_enter(&mut self, coord: CellCoord) {
        if let SelectionState::Dragging(drag) = &mut self.state {
            if drag.whole_column {
                drag.end.col = coord.col;
            } else {
                drag.end = coord;
            }
        }
    }

    /// Pointer moved over a month header; ignored unless dragging
    pub fn pointer_enter_header(&mut self, col: usize) {
        if let SelectionState::Dragging(drag) = &mut self.state {
            drag.end.col = col;
        }
    }

    /// Pointer released; always ends a drag
    ///
    /// # Errors
    /// Returns error if a header click lands outside the month columns
    pub fn pointer_up(&mut self, grid: &impl GridModel) -> Result<Outcome, SelectionError> {
        let SelectionState::Dragging(mut drag) = self.state.clone() else {
            return Ok(Outcome::None);
        };
        // pointer_enter is unchecked; keep the end inside the grid
        drag.end = CellCoord::new(
            drag.end.row.min(grid.row_count().saturating_sub(1)),
            drag.end.col.min(grid.col_count().saturating_sub(1)),
        );

        if drag.whole_column {
            self.enter(SelectionState::Idle)?;
            if drag.end.col == drag.origin.col {
                return self.toggle_month(grid, drag.origin.col);
            }
            let last = grid.row_count().saturating_sub(1);
            let range = CellRange::spanning(
                CellCoord::new(0, drag.origin.col),
                CellCoord::new(last, drag.end.col),
            );
            return Ok(self.commit_range(range));
        }

        if drag.end != drag.origin {
            self.enter(SelectionState::Idle)?;
            return Ok(self.commit_range(CellRange::spanning(drag.origin, drag.end)));
        }

        self.rectangle = None;
        match grid.cell_target(drag.origin) {
            Some(target) if self.view == ForestKind::Projects && target.is_root => {
                self.enter(SelectionState::Editing(EditSession {
                    draft: target.capacity.to_string(),
                    target: target.clone(),
                }))?;
                Ok(Outcome::EditStarted(target))
            }
            Some(target) => {
                self.enter(SelectionState::Idle)?;
                Ok(Outcome::OpenAssignmentEditor(target))
            }
            None => {
                self.enter(SelectionState::Idle)?;
                Ok(Outcome::None)
            }
        }
    }

    fn commit_range(&mut self, range: CellRange) -> Outcome {
        self.months.clear();
        self.rows.clear();
        self.rectangle = Some(range);
        tracing::debug!(view = %self.view, cells = range.cell_count(), "range selected");
        Outcome::RangeCommitted(range)
    }

    fn toggle_month(&mut self, grid: &impl GridModel, col: usize) -> Result<Outcome, SelectionError> {
        let month = grid
            .months()
            .get(col)
            .cloned()
            .ok_or(SelectionError::ColumnOutOfBounds(col))?;
        self.rectangle = None;
        let selected = if self.months.remove(&col) {
            false
        } else {
            self.months.insert(col);
            true
        };
        Ok(Outcome::ColumnToggled { month, selected })
    }

    /// Toggle a row in the selected-rows set; returns whether it is now selected
    ///
    /// # Errors
    /// Returns error in the Projects view
    pub fn toggle_row(&mut self, id: &NodeId) -> Result<bool, SelectionError> {
        if self.view == ForestKind::Projects {
            return Err(SelectionError::RowSelectionDisabled(id.clone()));
        }
        self.rectangle = None;
        if self.rows.shift_remove(id) {
            Ok(false)
        } else {
            self.rows.insert(id.clone());
            Ok(true)
        }
    }

    /// Open an inline edit on a cell without a click
    ///
    /// # Errors
    /// Returns error if the cell is not a resource cell or an edit is open
    pub fn begin_edit(
        &mut self,
        grid: &impl GridModel,
        coord: CellCoord,
    ) -> Result<Outcome, SelectionError> {
        let target = grid.cell_target(coord).ok_or(if grid.in_bounds(coord) {
            SelectionError::NotACell(coord)
        } else {
            SelectionError::OutOfBounds(coord)
        })?;
        let draft = if target.is_root {
            target.capacity.to_string()
        } else {
            target.effort.to_string()
        };
        self.enter(SelectionState::Editing(EditSession {
            target: target.clone(),
            draft,
        }))?;
        Ok(Outcome::EditStarted(target))
    }

    /// Replace the draft text
    ///
    /// # Errors
    /// Returns error if no edit is open
    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), SelectionError> {
        match &mut self.state {
            SelectionState::Editing(session) => {
                session.draft = text.into();
                Ok(())
            }
            _ => Err(SelectionError::NotEditing),
        }
    }

    /// Blur or Enter: parse the draft and close the editor
    ///
    /// # Errors
    /// Returns error if no edit is open
    pub fn commit_edit(&mut self) -> Result<Outcome, SelectionError> {
        let SelectionState::Editing(session) = self.state.clone() else {
            return Err(SelectionError::NotEditing);
        };
        self.enter(SelectionState::Idle)?;
        match parse_quantity(&session.draft) {
            Ok(value) => Ok(Outcome::InlineSave {
                is_capacity: session.target.is_root,
                target: session.target,
                value,
            }),
            Err(reason) => {
                tracing::debug!(input = %session.draft, %reason, "inline edit rejected");
                Ok(Outcome::EditRejected {
                    input: session.draft,
                    reason,
                })
            }
        }
    }

    /// Escape: close the editor without saving
    ///
    /// # Errors
    /// Returns error if no edit is open
    pub fn cancel_edit(&mut self) -> Result<Outcome, SelectionError> {
        if self.phase() != SelectionPhase::Editing {
            return Err(SelectionError::NotEditing);
        }
        self.enter(SelectionState::Idle)?;
        Ok(Outcome::EditDiscarded)
    }

    fn commit_if_editing(&mut self) -> Result<Outcome, SelectionError> {
        if self.phase() == SelectionPhase::Editing {
            self.commit_edit()
        } else {
            Ok(Outcome::None)
        }
    }

    /// Drop every selection and abort a drag; an open edit is kept
    pub fn clear(&mut self) {
        self.rectangle = None;
        self.rows.clear();
        self.months.clear();
        if self.phase() == SelectionPhase::Dragging {
            self.state = SelectionState::Idle;
        }
    }

    #[must_use]
    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            rows: self.rows.len(),
            months: self.months.len(),
            rectangle_cells: self.rectangle.map(|r| r.cell_count()),
        }
    }

    /// Every resource cell covered by the selection the summary counts
    ///
    /// The rectangle counts only while no rows or months are selected;
    /// otherwise the selected months and rows are unioned. Cells are listed
    /// once each, in row-major order. Group headers and action rows
    /// contribute nothing.
    #[must_use]
    pub fn selected_cells(&self, grid: &impl GridModel) -> Vec<CellTarget> {
        let mut coords: BTreeSet<CellCoord> = BTreeSet::new();
        if let Some(range) = self.rectangle.filter(|_| self.rows.is_empty() && self.months.is_empty()) {
            coords.extend(range.cells().filter(|c| grid.in_bounds(*c)));
        }
        for &col in &self.months {
            coords.extend((0..grid.row_count()).map(|row| CellCoord::new(row, col)));
        }
        if !self.rows.is_empty() {
            for row in 0..grid.row_count() {
                if grid.row_id(row).is_some_and(|id| self.rows.contains(id)) {
                    coords.extend((0..grid.col_count()).map(|col| CellCoord::new(row, col)));
                }
            }
        }
        coords
            .into_iter()
            .filter_map(|coord| grid.cell_target(coord))
            .collect()
    }
}
