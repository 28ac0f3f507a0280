//! prioritize - track which items and tags the rest of your work depends on
//!
//! Items and tags form two independent dependency graphs kept in one JSON
//! document. The crate ranks entities by how many others transitively depend
//! on them and projects the ranking as a tree, a vis.js dataset or Graphviz DOT.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Entity, Graph, Item, Standing, Tag};
pub use storage::{GraphStore, StoreError, Workspace};
