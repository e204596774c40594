//! Cell coordinates and rectangles

use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;

/// Grid position: row index and month column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    #[inline]
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Display for CellCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangle spanned by two corners, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    top_left: CellCoord,
    bottom_right: CellCoord,
}

impl CellRange {
    /// Rectangle with `a` and `b` as opposite corners, in any order
    #[must_use]
    pub fn spanning(a: CellCoord, b: CellCoord) -> Self {
        Self {
            top_left: CellCoord::new(a.row.min(b.row), a.col.min(b.col)),
            bottom_right: CellCoord::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    #[inline]
    #[must_use]
    pub fn top_left(&self) -> CellCoord {
        self.top_left
    }

    #[inline]
    #[must_use]
    pub fn bottom_right(&self) -> CellCoord {
        self.bottom_right
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> RangeInclusive<usize> {
        self.top_left.row..=self.bottom_right.row
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> RangeInclusive<usize> {
        self.top_left.col..=self.bottom_right.col
    }

    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        (self.bottom_right.row - self.top_left.row).saturating_add(1)
    }

    #[inline]
    #[must_use]
    pub fn col_count(&self) -> usize {
        (self.bottom_right.col - self.top_left.col).saturating_add(1)
    }

    /// Number of cells covered
    #[inline]
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.row_count().saturating_mul(self.col_count())
    }

    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.rows().contains(&coord.row) && self.cols().contains(&coord.col)
    }

    /// Covered cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.rows()
            .flat_map(move |row| self.cols().map(move |col| CellCoord::new(row, col)))
    }
}
