//! Toolbar selection summary

/// Counts behind the toolbar label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    pub rows: usize,
    pub months: usize,
    /// Cells in the active rectangle
    pub rectangle_cells: Option<usize>,
}

impl SelectionSummary {
    /// Rectangle cells when only a rectangle is active, otherwise rows + months
    #[must_use]
    pub fn count(&self) -> usize {
        match self.rectangle_cells {
            Some(cells) if self.rows == 0 && self.months == 0 => cells,
            _ => self.rows + self.months,
        }
    }

    /// Whether anything is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rectangle_cells.is_none() && self.rows == 0 && self.months == 0
    }

    /// Toolbar label, e.g. `6 cells selected` or `2 rows, 1 month selected`
    #[must_use]
    pub fn label(&self) -> String {
        if self.is_empty() {
            return "No selection".to_string();
        }
        match self.rectangle_cells {
            Some(cells) if self.rows == 0 && self.months == 0 => {
                format!("{cells} {} selected", plural(cells, "cell", "cells"))
            }
            _ => format!(
                "{} {}, {} {} selected",
                self.rows,
                plural(self.rows, "row", "rows"),
                self.months,
                plural(self.months, "month", "months")
            ),
        }
    }
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}
