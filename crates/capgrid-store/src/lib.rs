//! capgrid Store
//!
//! The authoritative allocation store: two mirrored forests and the mutator
//! that keeps them in agreement.
//!
//! # Core Concepts
//!
//! - [`TreeStore`]: the People forest and the Projects forest
//! - [`Forest`]: ordered roots with an id index over roots and assignment children
//! - [`AllocationMutator`]: save, delete, capacity and inline writes applied to both forests
//! - [`MutationReport`]: writes applied, nodes created or pruned, and skipped writes
//! - [`mirror_divergences`]: lists every (person, work item, month) the forests disagree on
//!
//! # Example
//!
//! ```rust
//! use capgrid_model::{EntityId, MonthLabel, NodeKind, NodeTemplate, Quantity};
//! use capgrid_store::{AllocationMutator, ForestKind, SaveAssignment, SeedForests, TreeStore};
//!
//! let ada = NodeTemplate::new(EntityId::new("e1")?, "Ada", NodeKind::Person);
//! let mut store = TreeStore::from_seed(SeedForests {
//!     people: vec![ada.to_root()],
//!     projects: Vec::new(),
//! })?;
//!
//! let atlas = NodeTemplate::new(EntityId::new("p1")?, "Atlas", NodeKind::WorkItem);
//! let report = AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::add(
//!     EntityId::new("e1")?,
//!     atlas,
//!     vec![MonthLabel::new("Jan")],
//!     Quantity::new(5.0)?,
//! ));
//! assert!(report.is_clean());
//! assert_eq!(store.forest(ForestKind::Projects).len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod consistency;
mod error;
mod forest;
mod mutator;
mod report;
mod request;
mod store;

pub use consistency::{mirror_divergences, Divergence};
pub use error::{ResolutionError, StoreError};
pub use forest::{Forest, ForestKind};
pub use mutator::{AllocationMutator, MutationSettings};
pub use report::{MutationReport, SkippedWrite};
pub use request::{DeleteAllocation, InlineSave, SaveAssignment, SaveMode};
pub use store::{SeedForests, TreeStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use capgrid_model::{EntityId, MonthLabel, NodeKind, NodeTemplate, Quantity};

    #[test]
    fn snapshot_is_isolated_from_later_mutation() {
        let ada = NodeTemplate::new(EntityId::new("e1").unwrap(), "Ada", NodeKind::Person);
        let mut store = TreeStore::from_seed(SeedForests {
            people: vec![ada.to_root()],
            projects: Vec::new(),
        })
        .unwrap();
        let before = store.snapshot();

        let atlas = NodeTemplate::new(EntityId::new("p1").unwrap(), "Atlas", NodeKind::WorkItem);
        AllocationMutator::new(&mut store).save_assignment(&SaveAssignment::add(
            EntityId::new("e1").unwrap(),
            atlas,
            vec![MonthLabel::new("Jan")],
            Quantity::new(5.0).unwrap(),
        ));

        assert!(before.projects().is_empty());
        assert_eq!(store.projects().len(), 1);
        assert!(mirror_divergences(&store).is_empty());
    }
}
