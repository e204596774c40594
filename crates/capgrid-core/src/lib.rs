//! capgrid Core
//!
//! Planner facade over the allocation store, the view materializer and the
//! selection engine.
//!
//! # Core Concepts
//!
//! - [`PlannerConfig`]: month vocabulary, default capacity and thresholds, loadable from TOML
//! - [`Planner`]: owns the store and expansion state; validates editor input
//! - [`SaveInput`] / [`DeleteInput`] / [`InlineInput`]: raw editor payloads
//! - [`AssignmentEditor`]: host hook opened by a click on an editable cell
//! - [`PlannerError`]: everything rejected at the boundary
//!
//! # Example
//!
//! ```rust
//! use capgrid_core::{Planner, PlannerConfig, SaveInput};
//! use capgrid_store::{ForestKind, SaveMode};
//!
//! let seed = r#"{
//!     "people": [{ "id": "e1", "displayName": "Ada", "kind": "person" }],
//!     "projects": []
//! }"#;
//! let mut planner = Planner::from_json(PlannerConfig::new(), seed)?;
//! let report = planner.save_assignment(&SaveInput {
//!     mode: SaveMode::Add,
//!     resource_id: "e1".into(),
//!     parent_id: None,
//!     months: vec!["Jan".into()],
//!     effort: "5".into(),
//!     new_item: Some(serde_json::from_str(
//!         r#"{ "id": "p9", "displayName": "Nova", "kind": "workItem" }"#,
//!     )?),
//!     role: None,
//!     is_capacity_edit: false,
//! })?;
//! assert!(report.is_clean());
//! assert_eq!(planner.store().forest(ForestKind::Projects).len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod input;
mod planner;

pub use config::{ConfigError, PlannerConfig};
pub use error::PlannerError;
pub use input::{DeleteInput, InlineInput, SaveInput};
pub use planner::{AssignmentEditor, Planner};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
