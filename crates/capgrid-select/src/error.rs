//! Error types for the selection engine

use crate::geometry::CellCoord;
use crate::state::SelectionPhase;
use capgrid_model::NodeId;

/// Errors related to pointer, row and edit gestures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Transition not in the allowed table
    #[error("illegal selection transition {from:?} -> {to:?}")]
    IllegalTransition {
        from: SelectionPhase,
        to: SelectionPhase,
    },

    /// Pointer outside the grid
    #[error("cell {0} is outside the grid")]
    OutOfBounds(CellCoord),

    /// Header index outside the month columns
    #[error("month column {0} is outside the grid")]
    ColumnOutOfBounds(usize),

    /// Cell is on a group header or action row
    #[error("cell {0} is not editable")]
    NotACell(CellCoord),

    /// Draft change or commit with no edit open
    #[error("no inline edit in progress")]
    NotEditing,

    /// Row selection is disabled in the Projects view
    #[error("row selection is disabled in this view, cannot select '{0}'")]
    RowSelectionDisabled(NodeId),
}
