//! capgrid Model
//!
//! Value types shared by the allocation store, the view materializer and the
//! selection engine.
//!
//! # Core Concepts
//!
//! - [`AllocationCell`]: effort and capacity for one month, with a derived [`CellStatus`]
//! - [`MonthLabel`] / [`MonthSet`]: the ordered month vocabulary
//! - [`Quantity`]: finite, non-negative amount; [`parse_quantity`] validates editor input
//! - [`NodeId`]: a root [`EntityId`] or a composite [`AssignmentId`] (`entity::parent`)
//! - [`ResourceNode`]: a person or work item with allocations and children
//! - [`NodeTemplate`]: descriptive shape used to synthesize roots and mirrored copies
//!
//! # Example
//!
//! ```rust
//! use capgrid_model::{AllocationCell, CellStatus, Quantity};
//!
//! let cell = AllocationCell::new(Quantity::new(25.0)?, Quantity::new(20.0)?);
//! assert_eq!(cell.status(), CellStatus::Over);
//! # Ok::<(), capgrid_model::QuantityError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cell;
mod id;
mod month;
mod node;
mod quantity;

pub use cell::{AllocationCell, CellStatus};
pub use id::{AssignmentId, EntityId, IdError, NodeId, ASSIGNMENT_SEPARATOR};
pub use month::{MonthError, MonthLabel, MonthSet, DEFAULT_MONTHS};
pub use node::{Allocations, NodeAttributes, NodeKind, NodeTemplate, ResourceNode};
pub use quantity::{parse_quantity, Quantity, QuantityError, TOLERANCE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
