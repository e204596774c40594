//! capgrid View
//!
//! Turns one forest into display rows. Materialization is a pure function
//! of the forest and a [`ViewQuery`]; nothing here writes to the store.
//!
//! # Core Concepts
//!
//! - [`FilterSet`]: child filters on fields, skills and capacity buckets
//! - [`rollup`]: parent cells summed from child effort
//! - [`GroupBy`]: none, by field, or by hierarchy; groups are [`ViewNode::Group`]
//! - [`flatten`]: depth-first [`Row`]s honouring [`ExpansionState`]
//!
//! # Pipeline
//!
//! filter → rollup → group → flatten

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod filter;
mod flatten;
mod group;
mod query;
mod rollup;
mod row;
mod utilization;

pub use filter::{Filter, FilterField, FilterSet};
pub use flatten::flatten;
pub use group::{group, GroupNode, GroupSummary, ViewNode, UNASSIGNED};
pub use query::{ExpansionState, GroupBy, GroupField, ViewQuery, ViewSettings};
pub use rollup::rollup;
pub use row::{ActionRow, GroupHeaderRow, ResourceRow, Row, RowAction, RowContent};
pub use utilization::{average_utilization, window_utilization, CapacityBucket, UtilizationThresholds};

use capgrid_model::ResourceNode;
use capgrid_store::Forest;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filtered, rolled-up and grouped tree for one forest
#[must_use]
pub fn view_nodes(forest: &Forest, query: &ViewQuery) -> Vec<ViewNode> {
    let thresholds = &query.settings.thresholds;
    let parents: Vec<ResourceNode> = forest
        .roots()
        .iter()
        .map(|root| {
            let filtered = query.filters.apply(root, &query.months, thresholds);
            if root.has_children() {
                rollup::sum_children(&filtered, &query.months)
            } else {
                filtered
            }
        })
        .collect();
    tracing::trace!(
        forest = %forest.kind(),
        parents = parents.len(),
        children = parents.iter().map(|p| p.children.len()).sum::<usize>(),
        "filtered and rolled up"
    );
    let nodes = group(parents, forest.kind().root_kind(), query);
    tracing::trace!(forest = %forest.kind(), nodes = nodes.len(), group_by = ?query.group_by, "grouped");
    nodes
}

/// Display rows for one forest
#[must_use]
pub fn materialize(forest: &Forest, query: &ViewQuery) -> Vec<Row> {
    let rows = flatten(&view_nodes(forest, query), query);
    tracing::trace!(forest = %forest.kind(), rows = rows.len(), "materialized");
    rows
}
