//! Error types for the capgrid planner
//!
//! Every boundary failure surfaces here:
//! - configuration problems
//! - editor input that is not a valid amount, month or id
//! - seed data rejected by the store
//! - selection gestures outside the grid
//!
//! Skipped writes are not errors; they are reported in a
//! [`MutationReport`](capgrid_store::MutationReport).

use crate::config::ConfigError;
use capgrid_model::{IdError, MonthError, QuantityError};
use capgrid_select::SelectionError;
use capgrid_store::StoreError;

/// Main planner error type
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Configuration rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Amount input rejected
    #[error("invalid amount: {0}")]
    Quantity(#[from] QuantityError),

    /// Month outside the configured vocabulary
    #[error("invalid month: {0}")]
    Month(#[from] MonthError),

    /// Malformed node or entity id
    #[error("invalid id: {0}")]
    Id(#[from] IdError),

    /// Seed data rejected
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Selection gesture rejected
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),
}

impl PlannerError {
    /// Whether the error came from user input rather than setup
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Quantity(_) | Self::Month(_) | Self::Id(_))
    }
}
