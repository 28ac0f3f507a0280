//! Domain models for prioritize
//!
//! Contains the graph store data and its algorithms without any I/O concerns.

mod entity;
mod graph;
mod traversal;
mod ranking;
mod rename;
mod projection;

pub use entity::{Entity, Item, Tag};
pub use graph::{Graph, Namespace};
pub use traversal::{is_depending_on, UNREACHABLE};
pub use ranking::{most_wanted, want_counts, Standing, Wanted};
pub use projection::{
    group_for, ranked_tree, to_dot, vis_dataset, RankedTree, TreeNode, VisDataSet, VisEdge,
    VisNode, FIRST_VIS_ID,
};
