//! Mutation reports

use crate::error::ResolutionError;
use crate::forest::ForestKind;
use capgrid_model::{MonthLabel, NodeId};

/// One write that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedWrite {
    /// `None` when resolution failed before either forest was touched
    pub forest: Option<ForestKind>,
    pub month: Option<MonthLabel>,
    pub reason: ResolutionError,
}

/// What a mutation did to the forests
///
/// Writes in one batch are independent: a skip never undoes earlier writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationReport {
    /// Cell writes applied (one per forest per month)
    pub written: usize,
    /// Nodes appended
    pub created: Vec<NodeId>,
    /// Assignment nodes spliced out
    pub pruned: Vec<NodeId>,
    pub skipped: Vec<SkippedWrite>,
}

impl MutationReport {
    /// Whether nothing was skipped
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Whether nothing changed
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.written == 0 && self.created.is_empty() && self.pruned.is_empty()
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: MutationReport) {
        self.written += other.written;
        self.created.extend(other.created);
        self.pruned.extend(other.pruned);
        self.skipped.extend(other.skipped);
    }

    pub(crate) fn skip(
        &mut self,
        forest: Option<ForestKind>,
        month: Option<&MonthLabel>,
        reason: ResolutionError,
    ) {
        tracing::warn!(
            forest = ?forest,
            month = ?month.map(MonthLabel::as_str),
            %reason,
            "allocation write skipped"
        );
        self.skipped.push(SkippedWrite {
            forest,
            month: month.cloned(),
            reason,
        });
    }
}
