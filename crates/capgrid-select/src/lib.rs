//! capgrid Select
//!
//! Pointer-driven selection over a materialized grid.
//!
//! # Core Concepts
//!
//! - [`SelectionEngine`]: `Idle`, `Dragging` and `Editing` states with checked transitions
//! - [`GridModel`]: row and month lookup the engine reads; [`Grid`] implements it over view rows
//! - [`Outcome`]: what a gesture asks the host to do (open the editor, save inline, ...)
//! - [`SelectionSummary`]: counts and toolbar label
//!
//! # State Machine
//!
//! ```text
//! Idle --down--> Dragging --up (moved)--> Idle + rectangle
//!                         --up (click)--> Idle + open editor
//!                         --up (Projects root)--> Editing --commit/cancel--> Idle
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod engine;
mod error;
mod geometry;
mod grid;
mod state;
mod summary;

pub use engine::{DragState, EditSession, Outcome, SelectionEngine, SelectionState};
pub use error::SelectionError;
pub use geometry::{CellCoord, CellRange};
pub use grid::{CellTarget, Grid, GridModel};
pub use state::{allowed_transitions, validate_transition, SelectionPhase};
pub use summary::SelectionSummary;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
