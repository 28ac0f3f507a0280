//! Shared graph store
//!
//! One mutex guards the graph and its backing resource together. Every
//! entry point (entity edits, removal, rename, load, save, ranking and
//! projections) goes through it, and callers only ever receive owned
//! snapshots or run a closure scoped to a single locked operation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{Graph, Item, RankedTree, Standing, Tag, VisDataSet};

use super::codec::{self, Backing, StoreError};

/// Behaviour switches for store-mediated edits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Skip adding a dependency edge that already exists
    pub dedup_edges: bool,
}

struct State<B> {
    graph: Graph,
    backing: B,
}

/// Graph store persisted to a backing resource
pub struct GraphStore<B> {
    state: Mutex<State<B>>,
    options: StoreOptions,
}

impl<B: Backing> GraphStore<B> {
    /// Creates an empty store over `backing` (nothing is read yet)
    pub fn new(backing: B) -> Self {
        Self::with_options(backing, StoreOptions::default())
    }

    pub fn with_options(backing: B, options: StoreOptions) -> Self {
        Self {
            state: Mutex::new(State {
                graph: Graph::new(),
                backing,
            }),
            options,
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    fn lock(&self) -> MutexGuard<'_, State<B>> {
        // Poisoning is ignored: every edit leaves the graph structurally valid.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the in-memory store with the backing resource's content
    ///
    /// A malformed document leaves the current content untouched.
    pub fn load(&self) -> Result<(), StoreError> {
        let mut state = self.lock();
        let graph = codec::load_from(&mut state.backing)?;
        tracing::debug!(
            items = graph.items.len(),
            tags = graph.tags.len(),
            "loaded store"
        );
        state.graph = graph;
        Ok(())
    }

    /// Writes the whole store to the backing resource
    pub fn save(&self) -> Result<(), StoreError> {
        let mut state = self.lock();
        let State { graph, backing } = &mut *state;
        let bytes = codec::save_to(graph, backing)?;
        tracing::debug!(bytes, "saved store");
        Ok(())
    }

    /// Runs `f` with shared access to the graph
    pub fn read<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
        f(&self.lock().graph)
    }

    /// Runs `f` with exclusive access to the graph
    pub fn update<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        f(&mut self.lock().graph)
    }

    /// Runs `f` and saves, both under the same lock
    pub fn commit<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> Result<R, StoreError> {
        let mut state = self.lock();
        let State { graph, backing } = &mut *state;
        let result = f(graph);
        let bytes = codec::save_to(graph, backing)?;
        tracing::debug!(bytes, "saved store");
        Ok(result)
    }

    /// Returns a copy of the whole graph
    pub fn snapshot(&self) -> Graph {
        self.read(Graph::clone)
    }

    /// Returns a copy of the item called `name`, creating it if needed
    pub fn get_item(&self, name: &str) -> Item {
        self.update(|g| g.get_item(name).clone())
    }

    /// Returns a copy of the tag called `name`, creating it if needed
    pub fn get_tag(&self, name: &str) -> Tag {
        self.update(|g| g.get_tag(name).clone())
    }

    pub fn remove_item(&self, name: &str, remove_references: bool) -> bool {
        self.update(|g| g.remove_item(name, remove_references))
    }

    pub fn remove_tag(&self, name: &str, remove_references: bool) -> bool {
        self.update(|g| g.remove_tag(name, remove_references))
    }

    pub fn each_item(&self, f: impl FnMut(&mut Item)) {
        self.update(|g| g.each_item(f));
    }

    pub fn each_tag(&self, f: impl FnMut(&mut Tag)) {
        self.update(|g| g.each_tag(f));
    }

    pub fn put_item(&self, item: Item) -> Item {
        self.update(|g| g.put_item(item).clone())
    }

    pub fn put_tag(&self, tag: Tag) -> Tag {
        self.update(|g| g.put_tag(tag).clone())
    }

    /// Makes item `from` depend on item `to`, creating both if needed
    pub fn add_item_dependency(&self, from: &str, to: &str) {
        let dedup = self.options.dedup_edges;
        self.update(|g| g.add_item_dependency(from, to, dedup));
    }

    pub fn remove_item_dependency(&self, from: &str, to: &str) {
        self.update(|g| g.remove_item_dependency(from, to));
    }

    /// Makes tag `from` depend on tag `to`, creating both if needed
    pub fn add_tag_dependency(&self, from: &str, to: &str) {
        let dedup = self.options.dedup_edges;
        self.update(|g| g.add_tag_dependency(from, to, dedup));
    }

    pub fn remove_tag_dependency(&self, from: &str, to: &str) {
        self.update(|g| g.remove_tag_dependency(from, to));
    }

    /// Attaches tag `tag` to item `item`, creating both if needed
    pub fn tag_item(&self, item: &str, tag: &str) {
        self.update(|g| g.tag_item(item, tag));
    }

    pub fn untag_item(&self, item: &str, tag: &str) {
        self.update(|g| g.untag_item(item, tag));
    }

    pub fn rename_item(&self, old: &str, new: &str) {
        self.update(|g| g.rename_item(old, new));
    }

    pub fn rename_tag(&self, old: &str, new: &str) {
        self.update(|g| g.rename_tag(old, new));
    }

    /// Returns copies of every item carrying one of `tags`
    pub fn items_for_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<Item> {
        self.read(|g| g.items_for_tags(tags).into_iter().cloned().collect())
    }

    /// Ranks all items, creating entities for dangling dependencies first
    pub fn item_ranking(&self) -> Vec<Standing> {
        self.update(Graph::item_ranking)
    }

    /// Ranks all tags, creating entities for dangling dependencies first
    pub fn tag_ranking(&self) -> Vec<Standing> {
        self.update(Graph::tag_ranking)
    }

    pub fn item_tree(&self) -> RankedTree {
        self.update(Graph::item_tree)
    }

    pub fn tag_tree(&self) -> RankedTree {
        self.update(Graph::tag_tree)
    }

    pub fn item_vis_dataset(&self) -> VisDataSet {
        self.update(Graph::item_vis_dataset)
    }

    /// Renders the item tree as Graphviz DOT
    pub fn item_dot(&self) -> String {
        self.update(Graph::item_dot)
    }

    /// Consumes the store and returns its backing resource
    pub fn into_backing(self) -> B {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .backing
    }
}
