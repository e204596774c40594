//! Grid model the selection engine reads from

use crate::geometry::CellCoord;
use capgrid_model::{EntityId, MonthLabel, NodeId, Quantity};
use capgrid_view::{Row, RowContent};

/// Everything an editor needs to know about one clicked cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellTarget {
    pub coord: CellCoord,
    pub resource: NodeId,
    pub parent: Option<EntityId>,
    pub month: MonthLabel,
    pub is_root: bool,
    pub effort: Quantity,
    pub capacity: Quantity,
}

/// Read access to the rendered grid
pub trait GridModel {
    /// Rows including group headers and action rows
    fn row_count(&self) -> usize;

    /// Visible month columns
    fn months(&self) -> &[MonthLabel];

    /// Resource id of a row, `None` for group headers and action rows
    fn row_id(&self, row: usize) -> Option<&NodeId>;

    /// Target for an editable cell, `None` for non-resource rows
    fn cell_target(&self, coord: CellCoord) -> Option<CellTarget>;

    #[inline]
    fn col_count(&self) -> usize {
        self.months().len()
    }

    #[inline]
    fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.row < self.row_count() && coord.col < self.col_count()
    }
}

/// [`GridModel`] over materialized rows
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: Vec<Row>,
    months: Vec<MonthLabel>,
}

impl Grid {
    #[must_use]
    pub fn new(rows: Vec<Row>, months: Vec<MonthLabel>) -> Self {
        Self { rows, months }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl GridModel for Grid {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn months(&self) -> &[MonthLabel] {
        &self.months
    }

    fn row_id(&self, row: usize) -> Option<&NodeId> {
        self.rows.get(row)?.resource().map(|r| r.id())
    }

    fn cell_target(&self, coord: CellCoord) -> Option<CellTarget> {
        let month = self.months.get(coord.col)?;
        let RowContent::Resource(row) = &self.rows.get(coord.row)?.content else {
            return None;
        };
        Some(CellTarget {
            coord,
            resource: row.node.id.clone(),
            parent: row.parent.clone(),
            month: month.clone(),
            is_root: row.is_root,
            effort: row.node.effort(month),
            capacity: row.node.capacity(month),
        })
    }
}
